/// Typewriter frames over text that has already fully arrived.
///
/// Frame `i` shows the first `i + 1` characters followed by a blinking
/// cursor (`|` on even frames, a space on odd ones). The last frame is the
/// whole text without a cursor.
#[derive(Debug, Clone)]
pub struct RevealSequence {
    text: String,
    /// Byte offsets just past each character.
    ends: Vec<usize>,
    next: usize,
    finished: bool,
}

impl RevealSequence {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let ends = text.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
        Self {
            text,
            ends,
            next: 0,
            finished: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Everything has been shown, including the final cursorless frame.
    pub fn is_done(&self) -> bool {
        self.finished
    }
}

impl Iterator for RevealSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        match self.ends.get(self.next) {
            Some(&end) => {
                let cursor = if self.next % 2 == 0 { '|' } else { ' ' };
                self.next += 1;
                Some(format!("{}{cursor}", &self.text[..end]))
            }
            None => {
                self.finished = true;
                Some(self.text.clone())
            }
        }
    }
}
