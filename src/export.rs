//! Output writer for per-channel CSV files

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::Result;
use crate::fetch::Post;

/// Sanitize a channel stem to a safe filename.
fn sanitize_filename(name: &str) -> String {
    let re = Regex::new(r"[^\w\s\-]").unwrap();
    let cleaned = re.replace_all(name, "");
    let re_spaces = Regex::new(r"\s+").unwrap();
    let result = re_spaces.replace_all(cleaned.trim(), "_");
    let truncated: String = result.chars().take(50).collect();
    if truncated.is_empty() {
        "channel".to_string()
    } else {
        truncated
    }
}

/// Write one channel's posts to `<dir>/<stem>.csv`, overwriting any
/// existing file of the same name. The directory is created if missing.
/// Returns the written path.
pub fn write_posts(dir: &Path, channel_stem: &str, posts: &[Post]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}.csv", sanitize_filename(channel_stem)));
    let mut writer = csv::Writer::from_path(&path)?;

    writer.write_record(["text", "publication_time"])?;
    for post in posts {
        let timestamp = post.publication_time.to_rfc3339();
        writer.write_record([post.text.as_str(), timestamp.as_str()])?;
    }
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::tempdir;

    fn post(text: &str, secs: u32) -> Post {
        Post {
            text: text.to_string(),
            publication_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, secs).unwrap(),
            reactions: None,
        }
    }

    #[test]
    fn empty_table_still_writes_header_row() {
        let temp = tempdir().unwrap();

        let path = write_posts(temp.path(), "quiet_channel", &[]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), "text,publication_time");
    }

    #[test]
    fn writes_one_row_per_post_in_order() {
        let temp = tempdir().unwrap();
        let posts = vec![post("newest", 3), post("middle", 2), post("oldest", 1)];

        let path = write_posts(temp.path(), "ordered", &posts).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let texts: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(texts, ["newest", "middle", "oldest"]);
    }

    #[test]
    fn round_trip_preserves_text_and_timestamps() {
        let temp = tempdir().unwrap();
        let posts = vec![
            post("hello, world", 30),
            post("text with \"quotes\" and, commas", 20),
            post("multi\nline", 10),
        ];

        let path = write_posts(temp.path(), "round_trip", &posts).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "text");
        assert_eq!(&headers[1], "publication_time");

        let rows: Vec<(String, DateTime<Utc>)> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                let ts = DateTime::parse_from_rfc3339(&r[1]).unwrap().with_timezone(&Utc);
                (r[0].to_string(), ts)
            })
            .collect();

        assert_eq!(rows.len(), posts.len());
        for (row, post) in rows.iter().zip(&posts) {
            assert_eq!(row.0, post.text);
            assert_eq!(row.1, post.publication_time);
        }
    }

    #[test]
    fn overwrites_existing_file() {
        let temp = tempdir().unwrap();

        write_posts(temp.path(), "chan", &[post("old run", 1)]).unwrap();
        let path = write_posts(temp.path(), "chan", &[post("new run", 2)]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("new run"));
        assert!(!contents.contains("old run"));
    }

    #[test]
    fn creates_missing_output_directory() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("nested").join("output");

        let path = write_posts(&dir, "chan", &[]).unwrap();

        assert!(path.exists());
        assert_eq!(path, dir.join("chan.csv"));
    }

    #[test]
    fn file_is_named_after_channel_stem() {
        let temp = tempdir().unwrap();

        let path = write_posts(temp.path(), "rustlang", &[]).unwrap();

        assert_eq!(path.file_name().unwrap(), "rustlang.csv");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World!"), "Hello_World");
        assert_eq!(sanitize_filename("   spaces   "), "spaces");
        assert_eq!(sanitize_filename("☄️"), "channel");
        assert_eq!(sanitize_filename("under_score-dash"), "under_score-dash");
    }
}
