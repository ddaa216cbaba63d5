//! mIRC formatting control codes.

const BOLD: char = '\x02';
const COLOR: char = '\x03';
const HEX_COLOR: char = '\x04';
const RESET: char = '\x0f';
const MONOSPACE: char = '\x11';
const REVERSE: char = '\x16';
const ITALIC: char = '\x1d';
const STRIKETHROUGH: char = '\x1e';
const UNDERLINE: char = '\x1f';

/// Remove bold, color, reverse, italic, underline and reset codes.
///
/// Color codes take up to two foreground digits and an optional
/// `,` plus up to two background digits.
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            BOLD | RESET | MONOSPACE | REVERSE | ITALIC | STRIKETHROUGH | UNDERLINE => {}
            COLOR => {
                if take_digits(&mut chars, 2) > 0 && chars.peek() == Some(&',') {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                        chars.next();
                        take_digits(&mut chars, 2);
                    }
                }
            }
            HEX_COLOR => {
                take_hex(&mut chars, 6);
                if chars.peek() == Some(&',') {
                    chars.next();
                    take_hex(&mut chars, 6);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, max: usize) -> usize {
    let mut n = 0;
    while n < max && chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
        n += 1;
    }
    n
}

fn take_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, max: usize) -> usize {
    let mut n = 0;
    while n < max && chars.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
        chars.next();
        n += 1;
    }
    n
}

/// Wrap `text` in bold codes.
pub fn bold(text: &str) -> String {
    format!("{BOLD}{text}{BOLD}")
}
