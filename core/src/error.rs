pub type LandscapeResult<T> = Result<T, LandscapeError>;

// Everything that can go wrong while generating a landscape.
// Curve synthesis, sampling, rasterizing and dithering are total, so the only
// failure is a configuration the pipeline cannot honour.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LandscapeError {
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LandscapeError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::LandscapeError;

    #[test]
    fn configuration_message_is_prefixed() {
        let err = LandscapeError::configuration("palette has 3 colors");
        assert_eq!(err.to_string(), "configuration error: palette has 3 colors");
    }
}
