use num_traits::{One, WrappingAdd};
use std::{
    fs, io, mem,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Sequence<T>(T);

impl<T: One + WrappingAdd> Sequence<T> {
    pub fn new(value: T) -> Self {
        Sequence(value)
    }

    pub fn advance(&mut self) -> T {
        let next = self.0.wrapping_add(&T::one());
        mem::replace(&mut self.0, next)
    }
}

pub fn mkdir_if_not_exists(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).or_else(|err| {
        if err.kind() == io::ErrorKind::AlreadyExists {
            Ok(())
        } else {
            Err(err)
        }
    })
}

/// Seconds since the Unix epoch, saturating to zero for clocks set before it.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_returns_current_then_advances() {
        let mut seq = Sequence::new(1u64);
        assert_eq!(seq.advance(), 1);
        assert_eq!(seq.advance(), 2);
        assert_eq!(seq.advance(), 3);
    }

    #[test]
    fn sequence_wraps_around() {
        let mut seq = Sequence::new(u8::MAX);
        assert_eq!(seq.advance(), u8::MAX);
        assert_eq!(seq.advance(), 0);
    }

    #[test]
    fn mkdir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        mkdir_if_not_exists(&nested).unwrap();
        mkdir_if_not_exists(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
