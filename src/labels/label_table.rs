use std::path::Path;

use tracing::info;

use crate::error::{ClassifyError, Result};

/// Ordered class names: line `i` of the label file names output class `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Parses newline-separated labels. `\r\n` endings are accepted and a
    /// single trailing newline does not add an empty class.
    pub fn parse(text: &str) -> Result<Self> {
        let body = text.strip_suffix('\n').unwrap_or(text);
        if body.is_empty() {
            return Err(ClassifyError::LabelsEmpty);
        }
        let labels = body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
            .collect();
        Ok(LabelTable { labels })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ClassifyError::io(path, e))?;
        let table = Self::parse(&text)?;
        info!(path = %path.display(), classes = table.len(), "loaded label table");
        Ok(table)
    }

    pub fn from_labels(labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Err(ClassifyError::LabelsEmpty);
        }
        Ok(LabelTable { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn trailing_newline_is_not_a_class() {
        let t = LabelTable::parse("0\n1\n2\n").unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(2), Some("2"));
        assert_eq!(t.get(3), None);
    }

    #[test]
    fn crlf_and_utf8_labels() {
        let t = LabelTable::parse("가\r\n각\r\n간").unwrap();
        assert_eq!(t.iter().collect::<Vec<_>>(), vec!["가", "각", "간"]);
    }

    #[test]
    fn interior_blank_lines_keep_their_index() {
        let t = LabelTable::parse("a\n\nc").unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(1), Some(""));
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(LabelTable::parse(""), Err(ClassifyError::LabelsEmpty)));
        assert!(matches!(LabelTable::parse("\n"), Err(ClassifyError::LabelsEmpty)));
        assert!(matches!(LabelTable::from_labels(vec![]), Err(ClassifyError::LabelsEmpty)));
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "zero\none\n").unwrap();
        let t = LabelTable::load(file.path()).unwrap();
        assert_eq!(t.len(), 2);

        let err = LabelTable::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, ClassifyError::Io { .. }));
    }
}
