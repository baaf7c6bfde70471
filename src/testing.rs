//! Shared helpers for rendering tests.

use ratatui::buffer::Buffer;

use crate::widget::buffer_lines;

/// Compares every buffer row against `expected`, reporting the first mismatch.
pub fn assert_buffer(buf: &Buffer, expected: &[&str]) {
    let actual = buffer_lines(buf);
    let buffer_width = buf.area().width as usize;

    assert_eq!(
        actual.len(),
        expected.len(),
        "Buffer height mismatch: expected {} lines, got {}",
        expected.len(),
        actual.len()
    );
    for (i, expected_line) in expected.iter().enumerate() {
        assert_eq!(
            actual[i].chars().count(),
            buffer_width,
            "Line {} width mismatch: expected {}, got {}",
            i,
            buffer_width,
            actual[i].chars().count()
        );
        assert_eq!(
            actual[i], *expected_line,
            "Line {i} mismatch:\n  expected: {expected_line:?}\n  actual:   {:?}",
            actual[i]
        );
    }
}
