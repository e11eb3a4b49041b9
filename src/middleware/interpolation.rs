//! `{{ key }}` placeholder substitution
//!
//! Placeholders are replaced by the text of the record attribute with the
//! same key. Whitespace around the key is ignored; unknown keys leave the
//! placeholder untouched. Malformed templates fail with an error carrying
//! the byte offset of the offending marker.

use crate::core::{Attrs, LoggerError, Middleware, Record, Result};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Char,
    /// Just consumed `{{`
    KeyOpen,
    KeyName,
    /// Just consumed a `}}` that closed a known key
    KeyClose,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Substitute every `{{ key }}` in `src` from `attrs`.
///
/// The input is returned borrowed when nothing was substituted.
///
/// # Example
///
/// ```
/// use rust_structlog::core::{Attr, Attrs};
/// use rust_structlog::middleware::replace;
///
/// let mut attrs = Attrs::default();
/// attrs.push(Attr::string("name", "world"));
///
/// assert_eq!(replace("Hello {{ name }}!", &attrs).unwrap(), "Hello world!");
/// assert_eq!(replace("Hello {{ other }}!", &attrs).unwrap(), "Hello {{ other }}!");
/// assert!(replace("Hello {{ name", &attrs).is_err());
/// ```
pub fn replace<'s>(src: &'s str, attrs: &Attrs<'_>) -> Result<Cow<'s, str>> {
    // Without markers a scan cannot change anything.
    if !src.contains("{{") && !src.contains("}}") {
        return Ok(Cow::Borrowed(src));
    }

    let bytes = src.as_bytes();
    let mut out = String::new();
    let mut changed = false;

    let mut state = State::Char;
    let mut open = 0;
    let mut literal = 0;
    let (mut key_start, mut key_end) = (0, 0);

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let doubled = bytes.get(i + 1) == Some(&b);

        if b == b'{' && doubled {
            if !matches!(state, State::Char | State::KeyClose) {
                return Err(LoggerError::IndirectOpenKey { offset: i });
            }
            out.push_str(&src[literal..i]);
            literal = i;
            open = i;
            state = State::KeyOpen;
            i += 2;
            continue;
        }

        if b == b'}' && doubled {
            match state {
                State::KeyName => {
                    let key = &src[key_start..key_end];
                    i += 2;
                    match attrs.search(key) {
                        Some(attr) => {
                            attr.value.write_text(&mut out);
                            changed = true;
                            literal = i;
                            state = State::KeyClose;
                        }
                        // The placeholder stays part of the pending literal.
                        None => state = State::Char,
                    }
                    continue;
                }
                State::KeyOpen => return Err(LoggerError::EmptyKey { offset: i }),
                _ => return Err(LoggerError::IndirectCloseKey { offset: i }),
            }
        }

        match state {
            State::KeyOpen if !is_whitespace(b) => {
                state = State::KeyName;
                key_start = i;
                key_end = i + 1;
            }
            State::KeyName if !is_whitespace(b) => key_end = i + 1,
            State::KeyClose => state = State::Char,
            _ => {}
        }
        i += 1;
    }

    if matches!(state, State::KeyOpen | State::KeyName) {
        return Err(LoggerError::UnclosedKey { offset: open });
    }
    if !changed {
        return Ok(Cow::Borrowed(src));
    }

    out.push_str(&src[literal..]);
    Ok(Cow::Owned(out))
}

/// Middleware interpolating the record message from its attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolation;

impl Interpolation {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for Interpolation {
    fn handle(&self, record: &mut Record<'_>) -> Result<()> {
        let message = match replace(&record.message, &record.attrs)? {
            Cow::Owned(message) => message,
            Cow::Borrowed(_) => return Ok(()),
        };
        record.message = Cow::Owned(message);
        Ok(())
    }

    fn name(&self) -> &str {
        "interpolation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attr, Level};
    use std::time::Duration;

    fn attrs(items: Vec<Attr<'static>>) -> Attrs<'static> {
        let mut attrs = Attrs::default();
        attrs.append(items);
        attrs
    }

    fn name_world() -> Attrs<'static> {
        attrs(vec![Attr::string("name", "world")])
    }

    #[test]
    fn test_no_placeholders() {
        for src in ["Hello world!", "Привет мир!", "Hello {} world!", ""] {
            let out = replace(src, &name_world()).unwrap();
            assert!(matches!(out, Cow::Borrowed(s) if s == src));
        }
    }

    #[test]
    fn test_empty_attrs_leave_message_unchanged() {
        let empty = Attrs::default();
        assert_eq!(replace("Hello {{ name }}!", &empty).unwrap(), "Hello {{ name }}!");
        assert_eq!(replace("Привет {{ name }}!", &empty).unwrap(), "Привет {{ name }}!");
    }

    #[test]
    fn test_unknown_key_is_verbatim() {
        let attrs = attrs(vec![Attr::string("world", "world")]);
        assert_eq!(replace("Hello {{ name }}!", &attrs).unwrap(), "Hello {{ name }}!");
        assert_eq!(
            replace("{{a}} and {{ name }}", &attrs).unwrap(),
            "{{a}} and {{ name }}"
        );
    }

    #[test]
    fn test_substitution() {
        assert_eq!(replace("Hello {{ name }}!", &name_world()).unwrap(), "Hello world!");
        assert_eq!(replace("Hello {{name}}!", &name_world()).unwrap(), "Hello world!");
        assert_eq!(
            replace("Hello {{\t name \n}}!", &name_world()).unwrap(),
            "Hello world!"
        );

        let cyr = attrs(vec![Attr::string("name", "мир")]);
        assert_eq!(replace("Привет {{ name }}!", &cyr).unwrap(), "Привет мир!");
    }

    #[test]
    fn test_adjacent_and_mixed_placeholders() {
        let attrs = attrs(vec![
            Attr::string("name", "world"),
            Attr::string("char", "!"),
            Attr::int("count", 7),
            Attr::any("err", "fatal error"),
            Attr::duration("took", Duration::from_millis(1500)),
        ]);

        assert_eq!(
            replace("Hello {{ name }}{{ char }}", &attrs).unwrap(),
            "Hello world!"
        );
        assert_eq!(
            replace("{{ count }} items in {{ took }}, {{ missing }} \"{{ err }}\"", &attrs)
                .unwrap(),
            "7 items in 1.5s, {{ missing }} \"fatal error\""
        );
    }

    #[test]
    fn test_interior_whitespace_is_part_of_key() {
        let attrs = attrs(vec![Attr::string("first name", "Ada")]);
        assert_eq!(replace("Hi {{  first name  }}", &attrs).unwrap(), "Hi Ada");
    }

    #[test]
    fn test_indirect_open_key() {
        let err = replace("Hello {{ name {{ key!", &name_world()).unwrap_err();
        assert!(matches!(err, LoggerError::IndirectOpenKey { offset: 14 }));
        assert_eq!(err.to_string(), "indirect open key at 14");
    }

    #[test]
    fn test_indirect_close_key() {
        let err = replace("Hello name }}!", &name_world()).unwrap_err();
        assert!(matches!(err, LoggerError::IndirectCloseKey { offset: 11 }));
    }

    #[test]
    fn test_empty_key() {
        let err = replace("Hello {{}}!", &Attrs::default()).unwrap_err();
        assert!(matches!(err, LoggerError::EmptyKey { offset: 8 }));

        let err = replace("Hello {{   }}!", &name_world()).unwrap_err();
        assert!(matches!(err, LoggerError::EmptyKey { offset: 11 }));
    }

    #[test]
    fn test_unclosed_key_points_at_opening() {
        let err = replace("Hello {{ key", &name_world()).unwrap_err();
        assert!(matches!(err, LoggerError::UnclosedKey { offset: 6 }));

        let err = replace("Hello {{", &name_world()).unwrap_err();
        assert!(matches!(err, LoggerError::UnclosedKey { offset: 6 }));
    }

    #[test]
    fn test_middleware_rewrites_message() {
        let mut record = Record::new(Level::INFO, "Hello {{ name }}", name_world());
        Interpolation.handle(&mut record).unwrap();

        assert_eq!(record.message, "Hello world");
        assert_eq!(record.attrs.len(), 1);
        assert_eq!(record.attrs.search("name").unwrap().value.as_str(), "world");
    }

    #[test]
    fn test_middleware_error_keeps_message() {
        let mut record = Record::new(Level::INFO, "Hello {{ name ", name_world());
        let err = Interpolation.handle(&mut record).unwrap_err();

        assert!(matches!(err, LoggerError::UnclosedKey { .. }));
        assert_eq!(record.message, "Hello {{ name ");
    }
}
