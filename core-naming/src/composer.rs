//! Filename Composition
//!
//! Renders a template with resolved tokens, appends the media kind and a
//! short content hash, and slugifies the result into a basename. The output
//! depends only on its inputs.

use bridge_traits::content::UploadDescriptor;
use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::resolver::ResolvedTokens;
use crate::template::render;

/// Number of content hash characters kept in the basename.
pub const HASH_SUFFIX_LEN: usize = 5;

/// Media marker embedded in every basename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `video/*` is [`MediaKind::Video`]; anything else, including an unknown
    /// MIME type, is [`MediaKind::Image`].
    pub fn from_mime(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(mime) if mime.starts_with("video") => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leading characters of the content hash, all of it when shorter.
pub fn hash_suffix(content_hash: &str) -> &str {
    match content_hash.char_indices().nth(HASH_SUFFIX_LEN) {
        Some((idx, _)) => &content_hash[..idx],
        None => content_hash,
    }
}

/// Compose a basename (no extension) for one asset.
///
/// Unresolved tokens render as `""`.
pub fn compose(
    template: &str,
    resolved: &ResolvedTokens,
    media_kind: MediaKind,
    content_hash: &str,
) -> String {
    let rendered = render(template, |token| resolved.get(token).unwrap_or(""));
    let full = format!(
        "{} {} {}",
        rendered,
        media_kind,
        hash_suffix(content_hash)
    );
    slugify(&full)
}

/// [`compose`] with media kind and hash taken from the upload.
pub fn compose_for_upload(
    template: &str,
    resolved: &ResolvedTokens,
    upload: &UploadDescriptor,
) -> String {
    compose(
        template,
        resolved,
        MediaKind::from_mime(upload.mime_type.as_deref()),
        &upload.md5,
    )
}

/// Lowercase ASCII, hyphen-separated.
///
/// The lowercased input is decomposed (NFD) and its combining marks dropped,
/// so precomposed and decomposed accents fold the same way; Latin letters
/// without a decomposition (`ß`, `ø`, `æ`, ...) go through a small table.
/// Every other run of characters outside `[a-z0-9]` becomes a single `-`,
/// and leading or trailing hyphens are dropped. Idempotent.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    let chars = input
        .chars()
        .flat_map(char::to_lowercase)
        .nfd()
        .filter(|c| !is_combining_mark(*c));

    for c in chars {
        let mut buf = [0u8; 4];
        let piece = if c.is_ascii_alphanumeric() {
            &*c.encode_utf8(&mut buf)
        } else if let Some(folded) = fold_to_ascii(c) {
            folded
        } else {
            pending_separator = true;
            continue;
        };

        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push_str(piece);
    }

    slug
}

/// ASCII spelling of a lowercase Latin letter that NFD leaves whole.
fn fold_to_ascii(c: char) -> Option<&'static str> {
    let folded = match c {
        'æ' => "ae",
        'đ' | 'ð' => "d",
        'ħ' => "h",
        'ı' => "i",
        'ł' => "l",
        'ø' => "o",
        'œ' => "oe",
        'ß' => "ss",
        'þ' => "th",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> ResolvedTokens {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_compose_simple_handle() {
        let resolved = tokens(&[("handle", "blue-shirt")]);
        assert_eq!(
            compose("{handle}", &resolved, MediaKind::Image, "abcdef123456"),
            "blue-shirt-image-abcde"
        );
    }

    #[test]
    fn test_compose_keeps_literal_text() {
        let resolved = tokens(&[("type", "Jacket"), ("handle", "rain-coat")]);
        assert_eq!(
            compose("{type}s / {handle}", &resolved, MediaKind::Video, "0f1e2d3c"),
            "jackets-rain-coat-video-0f1e2"
        );
    }

    #[test]
    fn test_compose_unresolved_tokens_render_empty() {
        let resolved = tokens(&[]);
        assert_eq!(
            compose("{missing}", &resolved, MediaKind::Image, "abcdef"),
            "image-abcde"
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        let resolved = tokens(&[("handle", "Blue Shirt")]);
        let first = compose("{handle} front", &resolved, MediaKind::Image, "abcdef123456");
        let second = compose("{handle} front", &resolved, MediaKind::Image, "abcdef123456");
        assert_eq!(first, second);
    }

    #[test]
    fn test_compose_never_emits_extension() {
        let resolved = tokens(&[("name", "photo.jpg")]);
        let basename = compose("{name}", &resolved, MediaKind::Image, "abcdef");
        assert_eq!(basename, "photo-jpg-image-abcde");
        assert!(!basename.contains('.'));
    }

    #[test]
    fn test_compose_for_upload_reads_mime_and_hash() {
        let upload = UploadDescriptor {
            id: "u1".to_string(),
            basename: "clip".to_string(),
            filename: "clip.mp4".to_string(),
            format: None,
            md5: "99887766".to_string(),
            mime_type: Some("video/mp4".to_string()),
            url: None,
        };
        let resolved = tokens(&[("handle", "blue-shirt")]);
        assert_eq!(
            compose_for_upload("{handle}", &resolved, &upload),
            "blue-shirt-video-99887"
        );
    }

    #[test]
    fn test_media_kind_from_mime() {
        assert_eq!(MediaKind::from_mime(Some("video/quicktime")), MediaKind::Video);
        assert_eq!(MediaKind::from_mime(Some("image/png")), MediaKind::Image);
        assert_eq!(MediaKind::from_mime(Some("application/pdf")), MediaKind::Image);
        assert_eq!(MediaKind::from_mime(None), MediaKind::Image);
    }

    #[test]
    fn test_hash_suffix() {
        assert_eq!(hash_suffix("abcdef123456"), "abcde");
        assert_eq!(hash_suffix("abc"), "abc");
        assert_eq!(hash_suffix(""), "");
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Blue Shirt  image abcde"), "blue-shirt-image-abcde");
        assert_eq!(slugify("  --Hello, World!--  "), "hello-world");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("Straße"), "strasse");
        assert_eq!(slugify("ÆON Øre"), "aeon-ore");
        assert_eq!(slugify("Łódź Đakovo"), "lodz-dakovo");
    }

    #[test]
    fn test_slugify_folds_decomposed_accents() {
        assert_eq!(slugify("Cre\u{301}me"), "creme");
        assert_eq!(slugify("Cre\u{301}me Bru\u{302}le\u{301}e"), slugify("Crème Brûlée"));
        assert_eq!(slugify("Man\u{303}ana"), "manana");
    }

    #[test]
    fn test_slugify_dotted_capital_i() {
        assert_eq!(slugify("İstanbul"), "istanbul");
        assert_eq!(slugify("İZMİR"), "izmir");
    }

    #[test]
    fn test_slugify_drops_unfoldable_scripts() {
        assert_eq!(slugify("東京 tokyo"), "tokyo");
        assert_eq!(slugify("tee ☕ shirt"), "tee-shirt");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in [
            "Blue Shirt",
            "Crème Brûlée 2024",
            "Cre\u{301}me",
            "İstanbul",
            "a--b__c",
            "  x  ",
            "東京 tokyo",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }
}
