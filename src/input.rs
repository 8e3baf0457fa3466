use std::io::{self, Read};

use aho_corasick::{AhoCorasick, MatchKind};
use lib_2048::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Restart,
    Quit,
}

const KEYS: [(&[u8], Key); 14] = [
    (b"\x1b[A", Key::Move(Direction::Up)),
    (b"\x1b[B", Key::Move(Direction::Down)),
    (b"\x1b[C", Key::Move(Direction::Right)),
    (b"\x1b[D", Key::Move(Direction::Left)),
    (b"w", Key::Move(Direction::Up)),
    (b"s", Key::Move(Direction::Down)),
    (b"d", Key::Move(Direction::Right)),
    (b"a", Key::Move(Direction::Left)),
    (b"W", Key::Move(Direction::Up)),
    (b"S", Key::Move(Direction::Down)),
    (b"D", Key::Move(Direction::Right)),
    (b"A", Key::Move(Direction::Left)),
    (b"r", Key::Restart),
    (b"q", Key::Quit),
];

/// Turns raw terminal bytes into keys, holding back escape sequences split across reads.
pub struct KeyDecoder {
    searcher: AhoCorasick,
    buf: [u8; 128],
    buf_len: usize,
}

impl KeyDecoder {
    pub fn new() -> Result<Self, aho_corasick::BuildError> {
        let searcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(KEYS.map(|(pattern, _)| pattern))?;

        Ok(Self {
            searcher,
            buf: [0; 128],
            buf_len: 0,
        })
    }

    /// Blocks for one read. End of input decodes as [`Key::Quit`].
    pub fn read_keys(&mut self, input: &mut impl Read) -> io::Result<Vec<Key>> {
        let read = input.read(&mut self.buf[self.buf_len..])?;

        if read == 0 {
            return Ok(vec![Key::Quit]);
        }

        self.buf_len += read;

        let keys = self
            .searcher
            .find_iter(&self.buf[..self.buf_len])
            .map(|m| KEYS[m.pattern().as_usize()].1)
            .collect();

        self.buf_len = match &self.buf[..self.buf_len] {
            [.., 0x1b, b'['] => {
                self.buf[..2].copy_from_slice(b"\x1b[");
                2
            }
            [.., 0x1b] => {
                self.buf[0] = 0x1b;
                1
            }
            _ => 0,
        };

        Ok(keys)
    }
}
