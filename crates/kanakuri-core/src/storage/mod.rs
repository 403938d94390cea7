//! Destination file lifecycle.
//!
//! The transfer engine writes strictly sequentially, so the destination is
//! opened in append mode: every write lands at end-of-file regardless of any
//! read cursor, which lets verification stream the file from byte 0 while
//! the handle stays open.

mod destination;

pub use destination::Destination;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn truncate_open_discards_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"stale data").unwrap();

        let mut dest = Destination::open(&path, true).unwrap();
        assert_eq!(dest.len().unwrap(), 0);
        dest.append(b"fresh").unwrap();
        dest.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
    }

    #[test]
    fn append_open_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"hello ").unwrap();

        let mut dest = Destination::open(&path, false).unwrap();
        assert_eq!(dest.len().unwrap(), 6);
        dest.append(b"world").unwrap();
        dest.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn reader_starts_at_zero_and_does_not_disturb_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let mut dest = Destination::open(&path, true).unwrap();
        dest.append(b"aaaa").unwrap();

        let mut first = String::new();
        dest.reader().unwrap().read_to_string(&mut first).unwrap();
        assert_eq!(first, "aaaa");

        dest.append(b"bbbb").unwrap();
        let mut second = String::new();
        dest.reader().unwrap().read_to_string(&mut second).unwrap();
        assert_eq!(second, "aaaabbbb");
        assert_eq!(dest.len().unwrap(), 8);
    }

    #[test]
    fn truncate_to_discards_tail_of_failed_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let mut dest = Destination::open(&path, true).unwrap();
        dest.append(b"hello").unwrap();
        // Tail left behind by an append that failed partway.
        dest.append(b"wor").unwrap();

        dest.truncate_to(5).unwrap();
        assert_eq!(dest.len().unwrap(), 5);
        dest.truncate_to(5).unwrap();

        dest.append(b"world").unwrap();
        dest.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"helloworld");
    }
}
