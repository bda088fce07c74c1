//! Text sources feeding the placement payloads.
//!
//! - [`CyclicCorpus`] walks a buffer with a wrapping cursor and cuts chunks of
//!   a random word count.
//! - [`LineCorpus`] returns a random line.
use crate::error::{Result, SynthError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Something that yields the next string to render.
pub trait TextSource {
    fn next_text<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String>;
}

/// Wrapping cursor over a character buffer.
///
/// Each chunk draws `k` in `[min_words, max_words]` and collects characters
/// until the `k`-th space; that space is consumed but not emitted. Line breaks
/// are read as spaces. The buffer is shared, so clones are cheap and keep
/// independent cursors.
#[derive(Clone, Debug)]
pub struct CyclicCorpus {
    chars: Arc<[char]>,
    has_space: bool,
    cursor: usize,
    min_words: usize,
    max_words: usize,
}

impl CyclicCorpus {
    pub fn from_text(text: &str, min_words: usize, max_words: usize) -> Result<Self> {
        if min_words == 0 || min_words > max_words {
            return Err(SynthError::InvalidParameter(format!(
                "word range [{min_words}, {max_words}] must satisfy 1 <= min <= max"
            )));
        }
        let chars: Vec<char> = text
            .chars()
            .filter(|&c| c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        if chars.iter().all(|c| c.is_whitespace()) {
            return Err(SynthError::EmptyCorpus);
        }
        let has_space = chars.contains(&' ');
        Ok(Self {
            chars: chars.into(),
            has_space,
            cursor: 0,
            min_words,
            max_words,
        })
    }

    pub fn open(path: &Path, min_words: usize, max_words: usize) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SynthError::io(path, e))?;
        Self::from_text(&text, min_words, max_words)
    }

    /// Buffer length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor; positions wrap around the buffer.
    pub fn seek(&mut self, pos: usize) {
        self.cursor = pos % self.chars.len();
    }

    /// Clone with the cursor at `pos`.
    pub fn with_cursor(&self, pos: usize) -> Self {
        let mut out = self.clone();
        out.seek(pos);
        out
    }

    /// Next chunk of exactly `words` space-separated pieces.
    pub fn next_chunk(&mut self, words: usize) -> String {
        let n = self.chars.len();
        let mut out = String::new();
        if !self.has_space {
            // No delimiter to stop on: emit one full cycle.
            for i in 0..n {
                out.push(self.chars[(self.cursor + i) % n]);
            }
            return out;
        }
        let mut seen = 0usize;
        while seen < words {
            let c = self.chars[self.cursor];
            self.cursor = (self.cursor + 1) % n;
            if c == ' ' {
                seen += 1;
                if seen == words {
                    break;
                }
            }
            out.push(c);
        }
        out
    }
}

impl TextSource for CyclicCorpus {
    fn next_text<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
        let k = rng.gen_range(self.min_words..=self.max_words);
        Ok(self.next_chunk(k))
    }
}

/// Uniform choice among the non-empty lines of a text.
#[derive(Clone, Debug)]
pub struct LineCorpus {
    lines: Arc<[String]>,
}

impl LineCorpus {
    pub fn from_text(text: &str) -> Result<Self> {
        let lines: Vec<String> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .map(str::to_owned)
            .collect();
        if lines.is_empty() {
            return Err(SynthError::EmptyCorpus);
        }
        Ok(Self {
            lines: lines.into(),
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SynthError::io(path, e))?;
        Self::from_text(&text)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl TextSource for LineCorpus {
    fn next_text<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
        self.lines
            .choose(rng)
            .cloned()
            .ok_or(SynthError::EmptyCorpus)
    }
}

/// Corpus selection as it appears in tool configs.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorpusConfig {
    Lines {
        path: PathBuf,
    },
    Cyclic {
        path: PathBuf,
        #[serde(default = "default_min_words")]
        min_words: usize,
        #[serde(default = "default_max_words")]
        max_words: usize,
    },
}

fn default_min_words() -> usize {
    1
}

fn default_max_words() -> usize {
    5
}

/// Loaded corpus of either kind.
#[derive(Clone, Debug)]
pub enum Corpus {
    Lines(LineCorpus),
    Cyclic(CyclicCorpus),
}

impl Corpus {
    pub fn load(config: &CorpusConfig) -> Result<Self> {
        match config {
            CorpusConfig::Lines { path } => LineCorpus::open(path).map(Corpus::Lines),
            CorpusConfig::Cyclic {
                path,
                min_words,
                max_words,
            } => CyclicCorpus::open(path, *min_words, *max_words).map(Corpus::Cyclic),
        }
    }

    /// Independent copy for one worker; cyclic cursors start at a random offset.
    pub fn fork<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        match self {
            Corpus::Lines(lines) => Corpus::Lines(lines.clone()),
            Corpus::Cyclic(cyclic) => {
                let pos = rng.gen_range(0..cyclic.len());
                Corpus::Cyclic(cyclic.with_cursor(pos))
            }
        }
    }
}

impl TextSource for Corpus {
    fn next_text<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
        match self {
            Corpus::Lines(c) => c.next_text(rng),
            Corpus::Cyclic(c) => c.next_text(rng),
        }
    }
}
