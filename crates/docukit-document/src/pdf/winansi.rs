// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WinAnsiEncoding — the single-byte encoding the standard 14 PDF fonts are
// shown with. Those fonts have no Unicode mapping, so every string drawn with
// them has to be one byte per glyph.

/// Stand-in for characters the encoding has no byte for.
pub const REPLACEMENT: char = '?';

/// Code points of the 0x80..=0x9F block, which differs from Latin-1.
const HIGH_BLOCK: &[(char, u8)] = &[
    ('\u{20AC}', 0x80), // €
    ('\u{201A}', 0x82), // ‚
    ('\u{0192}', 0x83), // ƒ
    ('\u{201E}', 0x84), // „
    ('\u{2026}', 0x85), // …
    ('\u{2020}', 0x86), // †
    ('\u{2021}', 0x87), // ‡
    ('\u{02C6}', 0x88), // ˆ
    ('\u{2030}', 0x89), // ‰
    ('\u{0160}', 0x8A), // Š
    ('\u{2039}', 0x8B), // ‹
    ('\u{0152}', 0x8C), // Œ
    ('\u{017D}', 0x8E), // Ž
    ('\u{2018}', 0x91), // ‘
    ('\u{2019}', 0x92), // ’
    ('\u{201C}', 0x93), // “
    ('\u{201D}', 0x94), // ”
    ('\u{2022}', 0x95), // •
    ('\u{2013}', 0x96), // –
    ('\u{2014}', 0x97), // —
    ('\u{02DC}', 0x98), // ˜
    ('\u{2122}', 0x99), // ™
    ('\u{0161}', 0x9A), // š
    ('\u{203A}', 0x9B), // ›
    ('\u{0153}', 0x9C), // œ
    ('\u{017E}', 0x9E), // ž
    ('\u{0178}', 0x9F), // Ÿ
];

/// WinAnsi byte for `c`, if the encoding has one.
pub fn winansi_byte(c: char) -> Option<u8> {
    match u32::from(c) {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => u8::try_from(code).ok(),
        _ => HIGH_BLOCK
            .iter()
            .find(|(mapped, _)| *mapped == c)
            .map(|(_, byte)| *byte),
    }
}

/// Replace every character the encoding cannot show. Tabs become spaces.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            c if winansi_byte(c).is_some() => c,
            _ => REPLACEMENT,
        })
        .collect()
}

/// Encode `text` one byte per character.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| winansi_byte(c).unwrap_or(REPLACEMENT as u8))
        .collect()
}

/// Re-encode a UTF-8 string operand. `None` when there is nothing to change:
/// plain ASCII is identical in both encodings, and bytes that are not UTF-8
/// are taken to be WinAnsi already.
pub fn transcode_utf8(bytes: &[u8]) -> Option<Vec<u8>> {
    if bytes.is_ascii() {
        return None;
    }
    std::str::from_utf8(bytes).ok().map(encode)
}
