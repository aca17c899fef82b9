//! Profile listing
//!
//! Prints the profile carousel screen followed by one block per built-in
//! profile: aliases, phase totals and the targets after its document.

use std::io::Write;

use tracing::warn;

use ristretto_core::profile::{load_key, ProfileKey, ProfileTargets};
use ristretto_core::traits::ProfileSource;

use crate::display::Renderer;
use crate::error::Result;

/// Write the carousel and profile details to `out`
///
/// Returns the number of profiles whose phase list fails validation.
pub fn write_profiles<W: Write, S: ProfileSource>(
    out: &mut W,
    documents: &mut S,
    selected: Option<ProfileKey>,
) -> Result<usize> {
    let mut renderer = Renderer::new();
    renderer.render_profiles(selected);
    write!(out, "{}", renderer.screen())?;

    let mut invalid = 0;
    for key in ProfileKey::CAROUSEL {
        let profile = load_key(key);
        let defaults = ProfileTargets::defaults_for(Some(key));
        let targets = match documents.read_override(key.data_file()) {
            Some(document) => document.apply(defaults),
            None => defaults,
        };

        writeln!(out)?;
        writeln!(out, "{}", key.name())?;
        writeln!(out, "  aliases: {}", key.aliases().join(", "))?;
        if profile.is_empty() {
            writeln!(out, "  phases:  none, brewed from the adjustments")?;
        } else {
            writeln!(
                out,
                "  phases:  {} ({:.0} s, {:.0} g)",
                profile.phases.len(),
                profile.total_duration_s(),
                profile.total_volumetric_g()
            )?;
        }
        writeln!(
            out,
            "  targets: {:.1}°C for {:.0} s",
            targets.temp_c, targets.duration_s
        )?;

        if let Err(e) = profile.validate() {
            warn!("Profile {} is invalid: {}", key.name(), e);
            writeln!(out, "  invalid: {}", e)?;
            invalid += 1;
        }
    }

    Ok(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ristretto_core::profile::ProfileOverride;
    use ristretto_core::traits::NoProfileDocuments;

    struct LeverDocument;

    impl ProfileSource for LeverDocument {
        fn read_override(&mut self, path: &str) -> Option<ProfileOverride> {
            (path == ProfileKey::CreminaLever.data_file())
                .then(|| ProfileOverride::from_values(Some(94.0), Some(25.0)))
        }
    }

    fn listing<S: ProfileSource>(documents: &mut S, selected: Option<ProfileKey>) -> (String, usize) {
        let mut out = Vec::new();
        let invalid = write_profiles(&mut out, documents, selected).unwrap();
        (String::from_utf8(out).unwrap(), invalid)
    }

    #[test]
    fn test_listing_starts_with_carousel() {
        let (text, invalid) = listing(&mut NoProfileDocuments, Some(ProfileKey::Classic));
        assert_eq!(invalid, 0);
        assert!(text.starts_with("  === PROFILES ==="));
        assert!(text.contains("> Classic"));
        assert!(text.contains("  Cremina Lever\n"));
    }

    #[test]
    fn test_listing_applies_documents() {
        let (text, _) = listing(&mut LeverDocument, None);
        assert!(text.contains("  targets: 94.0°C for 25 s"));
        assert!(!text.contains("> "));
    }

    #[test]
    fn test_builtin_profiles_listed_valid() {
        let (text, invalid) = listing(&mut NoProfileDocuments, None);
        assert_eq!(invalid, 0);
        assert!(!text.contains("invalid:"));
        for key in ProfileKey::CAROUSEL {
            assert!(text.contains(&format!("\n{}\n", key.name())), "{:?}", key);
        }
    }
}
