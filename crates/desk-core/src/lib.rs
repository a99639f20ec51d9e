//! Foundational low-level utilities shared across Desk crates.
//!
//! Provides the shared wall clock, atomic file replacement for the config
//! document, and ticket naming helpers.

pub mod atomic_io;
pub mod clock;
pub mod naming;

pub use atomic_io::write_text_atomic;
pub use clock::current_unix_timestamp_ms;
pub use naming::{format_ticket_number, slug_channel_name};

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use super::*;

    #[test]
    fn clock_reads_a_plausible_present_instant() {
        // 2020-01-01 in unix ms; anything earlier means a broken clock read.
        assert!(current_unix_timestamp_ms() > 1_577_836_800_000);
    }

    #[test]
    fn write_text_atomic_writes_content() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("sample.txt");
        write_text_atomic(&path, "hello world").expect("write");
        let contents = read_to_string(&path).expect("read");
        assert_eq!(contents, "hello world");
    }

    #[test]
    fn write_text_atomic_replaces_without_leaving_staged_files() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("doc.json");
        write_text_atomic(&path, "first").expect("write");
        write_text_atomic(&path, "second").expect("rewrite");

        assert_eq!(read_to_string(&path).expect("read"), "second");
        let entries: Vec<_> = std::fs::read_dir(tempdir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec!["doc.json"]);
    }

    #[test]
    fn write_text_atomic_rejects_a_directory_target() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        assert!(write_text_atomic(tempdir.path(), "oops").is_err());
    }

    #[test]
    fn format_ticket_number_pads_to_four_digits() {
        assert_eq!(format_ticket_number(1), "0001");
        assert_eq!(format_ticket_number(437), "0437");
        assert_eq!(format_ticket_number(12_345), "12345");
    }

    #[test]
    fn slug_channel_name_lowercases_and_strips() {
        assert_eq!(
            slug_channel_name("ticket-0001-SomeUser"),
            "ticket-0001-someuser"
        );
        assert_eq!(slug_channel_name("ticket-0002-Jo Hn!"), "ticket-0002-jo-hn");
        assert_eq!(slug_channel_name("---"), "ticket");
    }
}
