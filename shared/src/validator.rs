//! YouTube URL validation for incoming download requests.
//!
//! Deliberately coarse: any youtube.com / youtu.be link with some path
//! counts, with dedicated patterns for the common watch, short-link,
//! shorts, embed, and playlist shapes. This is an allow-list for a URL
//! input field, not a grammar.

use once_cell::sync::Lazy;
use regex::Regex;

/// Shape of a recognized YouTube link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Standard watch?v= video.
    Watch,
    /// youtu.be short link.
    ShortLink,
    /// Vertical short-form video (/shorts/).
    Shorts,
    /// Embedded player URL.
    Embed,
    /// Playlist URL.
    Playlist,
    /// On-domain but none of the specific shapes.
    Other,
}

// ====== REGEX PATTERNS ======

static GENERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.?be)/.+").unwrap()
});

static WATCH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?youtube\.com/watch\?v=[\w-]+").unwrap()
});

static SHORT_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://youtu\.be/[\w-]+").unwrap()
});

static SHORTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?youtube\.com/shorts/[\w-]+").unwrap()
});

static EMBED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?youtube\.com/embed/[\w-]+").unwrap()
});

static PLAYLIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?youtube\.com/playlist\?list=[\w-]+").unwrap()
});

/// Check whether a string matches at least one accepted YouTube URL shape.
///
/// Pure function, no network access. Accepts scheme-less links.
pub fn is_valid_youtube_url(url: &str) -> bool {
    classify(url).is_some()
}

/// Classify a URL into its link kind, or `None` if it is not a YouTube URL.
///
/// Specific shapes are checked before the generic domain pattern, so a
/// shorts link classifies as [`LinkKind::Shorts`] rather than `Other`.
pub fn classify(url: &str) -> Option<LinkKind> {
    if PLAYLIST_RE.is_match(url) {
        return Some(LinkKind::Playlist);
    }
    if SHORTS_RE.is_match(url) {
        return Some(LinkKind::Shorts);
    }
    if EMBED_RE.is_match(url) {
        return Some(LinkKind::Embed);
    }
    if WATCH_RE.is_match(url) {
        return Some(LinkKind::Watch);
    }
    if SHORT_LINK_RE.is_match(url) {
        return Some(LinkKind::ShortLink);
    }
    if GENERIC_RE.is_match(url) {
        return Some(LinkKind::Other);
    }
    None
}
