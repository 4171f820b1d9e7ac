// In: src/registry.rs

//! The codec registry: a mapping from stable string identifiers to factory
//! functions, so codecs can be reconstructed from serialized configuration.
//!
//! The registry is strictly a boundary concern. Combinators never depend on
//! it; they only ever hold already-constructed codecs. A host embedding this
//! crate registers its own primitive codecs next to the builtins and can then
//! round-trip any nested combinator through JSON:
//!
//! ```
//! use lapis_codec::{Codec, CodecRegistry};
//!
//! let registry = CodecRegistry::with_builtins();
//! let codec = registry
//!     .build(&serde_json::json!({
//!         "id": "stack",
//!         "codecs": [
//!             { "id": "shuffle", "element_size": 4 },
//!             { "id": "zstd", "level": 3 },
//!         ],
//!     }))
//!     .unwrap();
//! assert_eq!(codec.get_config().unwrap()["id"], "stack");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::combinators::{CodecStack, FramedCodecStack, PickBestCodec};
use crate::error::LapisError;
use crate::kernels::{Rle, Shuffle, Zstd};
use crate::traits::Codec;

/// A factory reconstructs one codec kind from its JSON configuration. It
/// receives the registry so combinator factories can build their inner
/// codecs recursively.
pub type CodecFactory = fn(&serde_json::Value, &CodecRegistry) -> Result<Box<dyn Codec>, LapisError>;

/// Maps codec identifiers to factories.
#[derive(Default)]
pub struct CodecRegistry {
    factories: HashMap<String, CodecFactory>,
}

impl CodecRegistry {
    /// An empty registry with no codecs registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the three combinators and the bundled kernels.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(CodecStack::CODEC_ID, build_stack);
        registry.register(FramedCodecStack::CODEC_ID, build_framed);
        registry.register(PickBestCodec::CODEC_ID, build_best);
        registry.register(Zstd::CODEC_ID, build_zstd);
        registry.register(Rle::CODEC_ID, build_rle);
        registry.register(Shuffle::CODEC_ID, build_shuffle);
        registry
    }

    /// Registers (or replaces) a factory under `id`.
    pub fn register(&mut self, id: &str, factory: CodecFactory) {
        self.factories.insert(id.to_string(), factory);
    }

    /// Reconstructs a codec from the configuration emitted by
    /// [`Codec::get_config`].
    pub fn build(&self, config: &serde_json::Value) -> Result<Box<dyn Codec>, LapisError> {
        let id = config
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                LapisError::ConfigError("codec config is missing a string 'id' field".into())
            })?;
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| LapisError::UnknownCodecId(id.to_string()))?;
        factory(config, self)
    }
}

//==================================================================================
// Builtin Factories
//==================================================================================

/// Config shared by the two list-shaped combinators.
#[derive(Serialize, Deserialize)]
struct CodecListConfig {
    codecs: Vec<serde_json::Value>,
}

#[derive(Serialize, Deserialize)]
struct BestConfig {
    candidates: Vec<serde_json::Value>,
}

#[derive(Serialize, Deserialize)]
struct ZstdConfig {
    level: i32,
}

#[derive(Serialize, Deserialize)]
struct ShuffleConfig {
    element_size: usize,
}

fn build_inner_codecs(
    configs: &[serde_json::Value],
    registry: &CodecRegistry,
) -> Result<Vec<Box<dyn Codec>>, LapisError> {
    configs.iter().map(|config| registry.build(config)).collect()
}

fn build_stack(
    config: &serde_json::Value,
    registry: &CodecRegistry,
) -> Result<Box<dyn Codec>, LapisError> {
    let config: CodecListConfig = serde_json::from_value(config.clone())?;
    let codecs = build_inner_codecs(&config.codecs, registry)?;
    Ok(Box::new(CodecStack::new(codecs)))
}

fn build_framed(
    config: &serde_json::Value,
    registry: &CodecRegistry,
) -> Result<Box<dyn Codec>, LapisError> {
    let config: CodecListConfig = serde_json::from_value(config.clone())?;
    let codecs = build_inner_codecs(&config.codecs, registry)?;
    Ok(Box::new(FramedCodecStack::new(CodecStack::new(codecs))))
}

fn build_best(
    config: &serde_json::Value,
    registry: &CodecRegistry,
) -> Result<Box<dyn Codec>, LapisError> {
    let config: BestConfig = serde_json::from_value(config.clone())?;
    let candidates = build_inner_codecs(&config.candidates, registry)?;
    Ok(Box::new(PickBestCodec::new(candidates)?))
}

fn build_zstd(
    config: &serde_json::Value,
    _registry: &CodecRegistry,
) -> Result<Box<dyn Codec>, LapisError> {
    let config: ZstdConfig = serde_json::from_value(config.clone())?;
    Ok(Box::new(Zstd::new(config.level)))
}

fn build_rle(
    _config: &serde_json::Value,
    _registry: &CodecRegistry,
) -> Result<Box<dyn Codec>, LapisError> {
    Ok(Box::new(Rle::new()))
}

fn build_shuffle(
    config: &serde_json::Value,
    _registry: &CodecRegistry,
) -> Result<Box<dyn Codec>, LapisError> {
    let config: ShuffleConfig = serde_json::from_value(config.clone())?;
    Ok(Box::new(Shuffle::new(config.element_size)))
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_each_builtin_from_config() {
        let registry = CodecRegistry::with_builtins();
        let configs = [
            json!({ "id": "stack", "codecs": [] }),
            json!({ "id": "framed", "codecs": [{ "id": "rle" }] }),
            json!({ "id": "best", "candidates": [{ "id": "rle" }] }),
            json!({ "id": "zstd", "level": 7 }),
            json!({ "id": "rle" }),
            json!({ "id": "shuffle", "element_size": 8 }),
        ];
        for config in &configs {
            let codec = registry.build(config).unwrap();
            assert_eq!(codec.get_config().unwrap(), *config);
        }
    }

    #[test]
    fn test_config_roundtrip_preserves_behavior() {
        let registry = CodecRegistry::with_builtins();
        let config = json!({
            "id": "stack",
            "codecs": [
                { "id": "shuffle", "element_size": 4 },
                { "id": "zstd", "level": 3 },
            ],
        });
        let codec = registry.build(&config).unwrap();
        let rebuilt = registry.build(&codec.get_config().unwrap()).unwrap();

        let data: Vec<u8> = (0..97u8).cycle().take(4 * 300).collect();
        let encoded = codec.encode(&data).unwrap();
        assert_eq!(rebuilt.encode(&data).unwrap(), encoded);
        assert_eq!(rebuilt.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let registry = CodecRegistry::with_builtins();
        let result = registry.build(&json!({ "id": "no-such-codec" }));
        assert!(matches!(result, Err(LapisError::UnknownCodecId(id)) if id == "no-such-codec"));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let registry = CodecRegistry::with_builtins();
        for config in [json!({}), json!({ "id": 42 }), json!("zstd")] {
            assert!(matches!(
                registry.build(&config),
                Err(LapisError::ConfigError(_))
            ));
        }
    }

    #[test]
    fn test_malformed_params_are_rejected() {
        let registry = CodecRegistry::with_builtins();
        // `level` must be an integer.
        let result = registry.build(&json!({ "id": "zstd", "level": "high" }));
        assert!(matches!(result, Err(LapisError::SerdeJson(_))));
        // Combinator configs must carry their codec list.
        let result = registry.build(&json!({ "id": "stack" }));
        assert!(matches!(result, Err(LapisError::SerdeJson(_))));
    }

    #[test]
    fn test_empty_best_config_is_rejected() {
        let registry = CodecRegistry::with_builtins();
        let result = registry.build(&json!({ "id": "best", "candidates": [] }));
        assert!(matches!(result, Err(LapisError::ConfigError(_))));
    }

    #[test]
    fn test_custom_codec_registration() {
        fn build_reverse(
            _config: &serde_json::Value,
            _registry: &CodecRegistry,
        ) -> Result<Box<dyn Codec>, LapisError> {
            struct Reverse;
            impl Codec for Reverse {
                fn id(&self) -> &str {
                    "reverse"
                }
                fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
                    Ok(buf.iter().rev().copied().collect())
                }
                fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError> {
                    Ok(bytes.iter().rev().copied().collect())
                }
                fn get_config(&self) -> Result<serde_json::Value, LapisError> {
                    Ok(json!({ "id": "reverse" }))
                }
            }
            Ok(Box::new(Reverse))
        }

        let mut registry = CodecRegistry::with_builtins();
        registry.register("reverse", build_reverse);

        let codec = registry
            .build(&json!({
                "id": "stack",
                "codecs": [{ "id": "reverse" }, { "id": "rle" }],
            }))
            .unwrap();
        let data = b"registry-built stacks behave like hand-built ones".to_vec();
        let encoded = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), data);
    }
}
