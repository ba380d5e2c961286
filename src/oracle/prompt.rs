//! Persona text, task templates and generation parameters, plus the builders that combine them.

use super::validate::ValidChat;
use crate::llm::{GenerationParams, GenerationPrompt, InlineImage};

pub const PERSONA_INSTRUCTION: &str = "Sen mistik bir falcısın. Adın 'Mistik Falcı'. \
Kendini asla yapay zeka olarak tanıtma. Her zaman gizemli, bilge ve biraz sır dolu bir üslup kullan. \
Cevaplarında astroloji, numeroloji, tarot ve diğer kehanet yöntemlerinden bahsedebilirsin. \
Türkçe cevaplar ver ve asla İngilizce konuşma.";

pub const COFFEE_READING_INSTRUCTION: &str = "Fincandaki kahve telvesi şekillerini oku ve bana mistik, \
gerçekçi bir kahve falı yorumu yap. Yorum 5 paragraf uzunluğunda olsun, her biri 4-5 cümle içersin ve \
sırasıyla aşk, kariyer, sağlık, aile ve maneviyat konularına odaklansın. \
Şekiller, semboller ve anlamları üzerinden kehanette bulun.";

pub const CASUAL_CHAT_TEMPLATE: &str = "{{context}}Danışan şöyle dedi: \"{{message}}\"\n\
Kısa ve samimi bir karşılık ver, en fazla 1-2 cümle. \
İstersen 'Kartlara bakıyorum...' gibi mistik bir girişle başla.";

pub const SUBSTANTIVE_CHAT_TEMPLATE: &str = "{{context}}Danışanın sorusu: \"{{message}}\"\n\
Bu soruya 2-3 paragraflık, derin ve mistik bir yorumla cevap ver. \
'Kristal küremde görüyorum ki...' ya da 'Yıldızların konumuna göre...' gibi girişler kullanabilirsin.";

pub const NAME_CONTEXT_TEMPLATE: &str = "Danışanın adı: {{name}}. Ona adıyla hitap et.\n";

pub const BIRTH_DATE_CONTEXT_TEMPLATE: &str =
    "Danışanın doğum tarihi: {{birth_date}}. Burcunu ve numerolojik sayısını yorumuna kat.\n";

/// Messages shorter than this many characters are treated as casual.
pub const CASUAL_LENGTH_THRESHOLD: usize = 20;

/// Lowercase substrings that mark a message as a greeting.
pub const GREETING_KEYWORDS: &[&str] = &[
    "merhaba",
    "selam",
    "günaydın",
    "iyi akşamlar",
    "iyi geceler",
    "nasılsın",
    "naber",
    "hello",
];

pub const IMAGE_READING_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_output_tokens: 500,
    top_p: Some(0.8),
    top_k: Some(40),
};

pub const CASUAL_CHAT_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.8,
    max_output_tokens: 150,
    top_p: Some(0.9),
    top_k: Some(40),
};

pub const SUBSTANTIVE_CHAT_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.8,
    max_output_tokens: 400,
    top_p: Some(0.9),
    top_k: Some(40),
};

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution is a single pass over the template: inserted values are never scanned for
/// placeholders, and unknown keys are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            result.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    result.push_str(rest);
    result
}

/// Lowercases using the Turkish dotted/dotless I pairs (İ→i, I→ı).
fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'İ' => 'i',
            'I' => 'ı',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

pub fn is_casual(message: &str) -> bool {
    let trimmed = message.trim();
    if trimmed.chars().count() < CASUAL_LENGTH_THRESHOLD {
        return true;
    }
    let folded = fold_case(trimmed);
    GREETING_KEYWORDS.iter().any(|kw| folded.contains(kw))
}

pub fn image_reading(image: InlineImage) -> GenerationPrompt {
    GenerationPrompt {
        system_instruction: PERSONA_INSTRUCTION.to_string(),
        history: Vec::new(),
        instruction: COFFEE_READING_INSTRUCTION.to_string(),
        attachment: Some(image),
        params: IMAGE_READING_PARAMS,
    }
}

pub fn chat(chat: ValidChat) -> GenerationPrompt {
    let mut context = String::new();
    if let Some(ref name) = chat.name {
        context.push_str(&render(NAME_CONTEXT_TEMPLATE, &[("name", name)]));
    }
    if let Some(ref birth_date) = chat.birth_date {
        context.push_str(&render(
            BIRTH_DATE_CONTEXT_TEMPLATE,
            &[("birth_date", birth_date)],
        ));
    }

    let (template, params) = if is_casual(&chat.message) {
        (CASUAL_CHAT_TEMPLATE, CASUAL_CHAT_PARAMS)
    } else {
        (SUBSTANTIVE_CHAT_TEMPLATE, SUBSTANTIVE_CHAT_PARAMS)
    };

    GenerationPrompt {
        system_instruction: PERSONA_INSTRUCTION.to_string(),
        history: chat.history,
        instruction: render(
            template,
            &[("context", &context), ("message", &chat.message)],
        ),
        attachment: None,
        params,
    }
}
