//! # Dados de Entrada — Limpeza de Linhas e Corpus de Demonstração
//!
//! Os arquivos de entrada são texto puro, uma entrada por linha:
//!
//! - **Léxico**: `palavra<TAB>frequência`, ordenado do mais para o menos frequente.
//! - **Alvo**: uma hashtag por linha (`#throwbackthursday`).
//! - **Referência**: a segmentação correta, tokens separados por espaço.
//!
//! Toda linha passa pela mesma limpeza: remove espaços, tabs, quebras de linha
//! e `#` das pontas e converte para minúsculas.
//!
//! O módulo também traz um léxico pequeno e hashtags anotadas para a
//! interface web e para os testes.

use std::sync::OnceLock;

use regex::Regex;

use crate::tables::TableDefaults;

/// Palavras recentes que costumam faltar em listas de frequência antigas.
pub const MISSING_WORDS: &[&str] = &["mentalist", "espy", "ipad", "cuboulder", "iphone6s", "teaman"];

fn edge_noise() -> &'static Regex {
    static EDGE_NOISE: OnceLock<Regex> = OnceLock::new();
    EDGE_NOISE.get_or_init(|| Regex::new(r"^[ \t\r\n#]+|[ \t\r\n#]+$").expect("regex de limpeza válida"))
}

/// Remove ` `, `\t`, `\r`, `\n` e `#` das pontas e converte para minúsculas.
pub fn clean_line(line: &str) -> String {
    edge_noise().replace_all(line, "").to_lowercase()
}

/// Extrai a palavra de uma linha do léxico (`palavra<TAB>frequência`).
///
/// Retorna `None` para linhas em branco.
pub fn parse_lexicon_line(line: &str) -> Option<String> {
    let cleaned = clean_line(line);
    let word = cleaned.split('\t').next().unwrap_or_default();
    (!word.is_empty()).then(|| word.to_string())
}

/// Tokens de uma linha de referência.
pub fn parse_reference_line(line: &str) -> Vec<String> {
    clean_line(line).split_whitespace().map(str::to_string).collect()
}

/// Uma hashtag anotada com a segmentação correta.
pub struct HashtagSample {
    pub hashtag: &'static str,
    /// Domínio temático (só para agrupar na interface).
    pub domain: &'static str,
    pub reference: &'static [&'static str],
}

/// Parte "confiável" do léxico de demonstração, em ordem de frequência.
const DEMO_HEAD: &[&str] = &[
    "the", "of", "and", "to", "a", "in", "is", "it", "you", "that", "for", "on", "with", "as",
    "i", "be", "at", "this", "have", "from", "or", "by", "we", "me", "my", "so", "no", "do",
    "go", "up", "all", "love", "day", "new", "one", "time", "back", "life", "good", "best",
    "world", "happy", "night", "free", "year", "today", "just", "like", "get", "now", "out",
    "game", "music", "birthday", "thank", "god", "follow", "work", "home", "friday", "thursday",
    "monday", "weekend", "throw", "throwback", "photo", "summer", "city", "york", "food", "fun",
    "team", "win", "news", "friends", "family", "party", "beach", "coffee", "morning", "tea",
    "man", "play", "playing", "ever", "its", "mental", "list", "sun", "set", "sunset",
];

/// Cauda ruidosa: compostos acidentais e fragmentos típicos de listas da web.
const DEMO_TAIL: &[&str] = &[
    "loveyou", "newyork", "thankyou", "goodmorning", "happybirthday", "followback", "ot", "ew",
    "ng", "ay", "teamfollow", "bestday",
];

/// Léxico de demonstração ranqueado (cabeça confiável seguida da cauda ruidosa).
pub fn demo_lexicon() -> Vec<String> {
    DEMO_HEAD.iter().chain(DEMO_TAIL).map(|w| w.to_string()).collect()
}

/// Parâmetros das tabelas auxiliares proporcionais ao léxico de demonstração.
pub fn demo_table_params() -> TableDefaults {
    TableDefaults {
        reference_words: DEMO_HEAD.len(),
        low_rank_threshold: DEMO_HEAD.len(),
        short_word_max_len: 2,
        short_word_rank_bound: 60,
        lexicon_limit: DEMO_HEAD.len() + DEMO_TAIL.len(),
    }
}

/// Hashtags anotadas para a interface web e testes.
pub fn demo_hashtags() -> Vec<HashtagSample> {
    vec![
        HashtagSample {
            hashtag: "#throwbackthursday",
            domain: "nostalgia",
            reference: &["throwback", "thursday"],
        },
        HashtagSample {
            hashtag: "#ilovenewyork",
            domain: "viagem",
            reference: &["i", "love", "new", "york"],
        },
        HashtagSample {
            hashtag: "#happybirthdaytoyou",
            domain: "social",
            reference: &["happy", "birthday", "to", "you"],
        },
        HashtagSample {
            hashtag: "#goodmorningworld",
            domain: "social",
            reference: &["good", "morning", "world"],
        },
        HashtagSample {
            hashtag: "#teamfollowback",
            domain: "redes",
            reference: &["team", "follow", "back"],
        },
        HashtagSample {
            hashtag: "#nowplaying",
            domain: "música",
            reference: &["now", "playing"],
        },
        HashtagSample {
            hashtag: "#bestdayever",
            domain: "social",
            reference: &["best", "day", "ever"],
        },
        HashtagSample {
            hashtag: "#sunsetbeachparty",
            domain: "viagem",
            reference: &["sunset", "beach", "party"],
        },
        HashtagSample {
            hashtag: "#thementalist",
            domain: "tv",
            reference: &["the", "mentalist"],
        },
    ]
}
