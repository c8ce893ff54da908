//! The ordered list of lines shown inside the terminal window

/// One entry in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLine {
    /// A scripted command echo, already carrying its own prompt
    Command(String),
    /// Program output
    Output(String),
    /// What the user typed, with the prompt that was active at the time
    Input { prompt: String, text: String },
}

impl TranscriptLine {
    pub fn output(text: impl Into<String>) -> Self {
        TranscriptLine::Output(text.into())
    }

    /// The text payload, without any prompt
    pub fn text(&self) -> &str {
        match self {
            TranscriptLine::Command(text) | TranscriptLine::Output(text) => text,
            TranscriptLine::Input { text, .. } => text,
        }
    }
}

/// Append-only transcript with a full reset and single-entry replacement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: TranscriptLine) {
        self.lines.push(line);
    }

    pub fn push_output(&mut self, text: impl Into<String>) {
        self.push(TranscriptLine::output(text));
    }

    pub fn extend<I: IntoIterator<Item = TranscriptLine>>(&mut self, lines: I) {
        self.lines.extend(lines);
    }

    /// Replace the entry at `index`, or append when the transcript is not
    /// that long yet. Used by intro playback to retype one entry in place.
    pub fn replace_or_push(&mut self, index: usize, line: TranscriptLine) {
        match self.lines.get_mut(index) {
            Some(slot) => *slot = line,
            None => self.lines.push(line),
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptLine> {
        self.lines.last()
    }

    pub fn get(&self, index: usize) -> Option<&TranscriptLine> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptLine> {
        self.lines.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptLine;
    type IntoIter = std::slice::Iter<'a, TranscriptLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
