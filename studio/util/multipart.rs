/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(str::trim)
        .find_map(|s| s.strip_prefix("boundary="))
        .map(|b| b.trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// One part of a multipart body: its raw header block and its payload.
pub struct Part<'a> {
    pub headers: String,
    pub body: &'a [u8],
}

impl Part<'_> {
    pub fn is_file(&self) -> bool {
        self.headers.to_ascii_lowercase().contains("filename=")
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.headers.contains(&format!("name=\"{}\"", name))
    }
}

/// Splits a multipart/form-data body into its parts.
pub fn parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    let delim = delimiter.as_bytes();
    let sep = b"\r\n\r\n";

    let mut out = Vec::new();
    let mut rest = body;
    while let Some(pos) = find_subsequence(rest, delim) {
        let chunk = &rest[..pos];
        rest = &rest[pos + delim.len()..];
        if let Some(sep_pos) = find_subsequence(chunk, sep) {
            let raw = &chunk[sep_pos + sep.len()..];
            out.push(Part {
                headers: String::from_utf8_lossy(&chunk[..sep_pos]).into_owned(),
                body: raw.strip_suffix(b"\r\n").unwrap_or(raw),
            });
        }
    }
    out
}

/// Raw bytes of the first uploaded file.
pub fn extract_file<'a>(body: &'a [u8], boundary: &str) -> Option<&'a [u8]> {
    parts(body, boundary).into_iter().find(|p| p.is_file()).map(|p| p.body)
}

/// Value of a plain (non-file) field.
pub fn extract_text_field(body: &[u8], boundary: &str, name: &str) -> Option<String> {
    parts(body, boundary)
        .into_iter()
        .find(|p| p.has_name(name) && !p.is_file())
        .and_then(|p| String::from_utf8(p.body.to_vec()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"top_k\"\r\n\r\n3\r\n");
        b.extend_from_slice(
            b"--XyZ\r\nContent-Disposition: form-data; name=\"image\"; filename=\"d.png\"\r\n\
              Content-Type: image/png\r\n\r\n",
        );
        b.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x00]);
        b.extend_from_slice(b"\r\n--XyZ--\r\n");
        b
    }

    #[test]
    fn boundary_parsing() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"abc\"").as_deref(),
            Some("abc")
        );
        assert_eq!(extract_boundary("multipart/form-data"), None);
    }

    #[test]
    fn finds_file_and_text_parts() {
        let b = body();
        assert_eq!(extract_file(&b, "XyZ"), Some(&[0x89, b'P', b'N', b'G', 0x00][..]));
        assert_eq!(extract_text_field(&b, "XyZ", "top_k").as_deref(), Some("3"));
        assert_eq!(extract_text_field(&b, "XyZ", "image"), None);
    }
}
