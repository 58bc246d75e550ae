//! Separation model source vocabularies

use crate::error::{ExtractError, Result};
use crate::types::REQUIRED_STEMS;

const FOUR_STEMS: &[&str] = &["drums", "bass", "other", "vocals"];
const SIX_STEMS: &[&str] = &["drums", "bass", "other", "vocals", "guitar", "piano"];

/// Sources declared by well-known pretrained Demucs models
///
/// Used for early logging only; the installed model is always asked.
pub fn known_sources(model: &str) -> Option<&'static [&'static str]> {
    match model {
        "htdemucs" | "htdemucs_ft" | "hdemucs_mmi" | "mdx" | "mdx_extra" | "mdx_q"
        | "mdx_extra_q" => Some(FOUR_STEMS),
        "htdemucs_6s" => Some(SIX_STEMS),
        _ => None,
    }
}

/// Fail unless the model declares both `vocals` and `other`
pub fn ensure_required_sources(model: &str, available: &[String]) -> Result<()> {
    let complete = REQUIRED_STEMS
        .iter()
        .all(|role| available.iter().any(|s| s == role.source_name()));

    if complete {
        Ok(())
    } else {
        Err(ExtractError::MissingSources {
            model: model.to_string(),
            available: available.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_four_and_six_stem_models_accepted() {
        assert!(ensure_required_sources("htdemucs", &owned(FOUR_STEMS)).is_ok());
        assert!(ensure_required_sources("htdemucs_6s", &owned(SIX_STEMS)).is_ok());
        assert!(ensure_required_sources("two", &owned(&["vocals", "other"])).is_ok());
    }

    #[test]
    fn test_missing_vocals_rejected() {
        let available = owned(&["drums", "bass", "other"]);
        match ensure_required_sources("no_vocals", &available) {
            Err(ExtractError::MissingSources { model, available: a }) => {
                assert_eq!(model, "no_vocals");
                assert_eq!(a, available);
            }
            other => panic!("expected MissingSources, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_other_rejected() {
        assert!(ensure_required_sources("m", &owned(&["vocals", "accompaniment"])).is_err());
    }

    #[test]
    fn test_known_models() {
        assert_eq!(known_sources("htdemucs").map(|s| s.len()), Some(4));
        assert_eq!(known_sources("htdemucs_6s").map(|s| s.len()), Some(6));
        assert!(known_sources("my_custom_model").is_none());
    }
}
