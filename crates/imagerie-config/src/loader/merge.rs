//! Configuration merging logic
//!
//! A field of a file or explicit overlay wins only when it differs from the
//! default, so a sparse file never resets values set by earlier layers.
//! Environment variables bypass this and are written field by field.

use crate::{types::*, Config};

pub fn merge(base: Config, overlay: Config) -> Config {
    Config {
        core: merge_core(base.core, overlay.core),
        retrieval: merge_retrieval(base.retrieval, overlay.retrieval),
        llm: merge_llm(base.llm, overlay.llm),
        dialogue: merge_dialogue(base.dialogue, overlay.dialogue),
    }
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn pick_f32(base: f32, overlay: f32, default: f32) -> f32 {
    if (overlay - default).abs() > 0.0001 {
        overlay
    } else {
        base
    }
}

fn merge_core(base: CoreConfig, overlay: CoreConfig) -> CoreConfig {
    let default = CoreConfig::default();
    CoreConfig {
        guidelines_path: pick(
            base.guidelines_path,
            overlay.guidelines_path,
            default.guidelines_path,
        ),
        output_dir: pick(base.output_dir, overlay.output_dir, default.output_dir),
    }
}

fn merge_retrieval(base: RetrievalConfig, overlay: RetrievalConfig) -> RetrievalConfig {
    let default = RetrievalConfig::default();
    RetrievalConfig {
        top_k: pick(base.top_k, overlay.top_k, default.top_k),
        context_k: pick(base.context_k, overlay.context_k, default.context_k),
        embedding: pick(base.embedding, overlay.embedding, default.embedding),
        embedding_model: overlay.embedding_model.or(base.embedding_model),
        hash_dimension: pick(
            base.hash_dimension,
            overlay.hash_dimension,
            default.hash_dimension,
        ),
    }
}

fn merge_llm(base: LlmConfig, overlay: LlmConfig) -> LlmConfig {
    let default = LlmConfig::default();
    LlmConfig {
        provider: pick(base.provider, overlay.provider, default.provider),
        model: pick(base.model, overlay.model, default.model),
        api_base: overlay.api_base.or(base.api_base),
        temperature: pick_f32(base.temperature, overlay.temperature, default.temperature),
        max_tokens: pick(base.max_tokens, overlay.max_tokens, default.max_tokens),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, default.timeout_secs),
        max_retries: pick(base.max_retries, overlay.max_retries, default.max_retries),
    }
}

fn merge_dialogue(base: DialogueConfig, overlay: DialogueConfig) -> DialogueConfig {
    let default = DialogueConfig::default();
    DialogueConfig {
        mode: pick(base.mode, overlay.mode, default.mode),
        max_clarification_rounds: pick(
            base.max_clarification_rounds,
            overlay.max_clarification_rounds,
            default.max_clarification_rounds,
        ),
    }
}
