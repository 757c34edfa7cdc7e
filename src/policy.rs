//! Decides whether a piece of content warrants a provider call at all.

/// The language content on the platform is authored in.
pub const NATIVE_LANGUAGE: &str = "JA";

/// Default authored-language tag for content that does not declare one.
pub const DEFAULT_CONTENT_LANGUAGE: &str = "ja";

/// Returns `true` when `source` content should be translated into `target`.
///
/// Comparison is case-insensitive. Translation never targets the native
/// language, whatever its spelling (`ja`, `JA`, `ja-JP`), so native content is
/// never round-tripped through the provider.
pub fn needs_translation(source: &str, target: &str) -> bool {
    let source = source.trim();
    let target = target.trim();

    if source.eq_ignore_ascii_case(target) {
        return false;
    }

    !is_native(target)
}

fn is_native(code: &str) -> bool {
    code.split(['-', '_'])
        .next()
        .is_some_and(|primary| primary.eq_ignore_ascii_case(NATIVE_LANGUAGE))
}
