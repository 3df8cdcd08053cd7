//! Biblioteca da linha de comando `maxmatch`
//!
//! Lê um léxico ranqueado e um arquivo de hashtags (uma por linha), escreve
//! a segmentação de cada linha no arquivo de saída e, se houver um arquivo de
//! referência, acumula a WER por linha.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flate2::read::GzDecoder;
use maxmatch_core::{
    corpus::{clean_line, parse_lexicon_line, parse_reference_line},
    BuildOptions, MatchStrategy, SegmentOptions, Segmenter, TableDefaults, WerSummary,
};
use tracing::{debug, info, warn};

/// Segmenta hashtags por maximum matching e mede a Word Error Rate
#[derive(Debug, Parser)]
#[command(name = "maxmatch", version, about)]
pub struct Cli {
    /// Arquivo com as hashtags a segmentar, uma por linha
    #[arg(long, value_name = "FILE", default_value = "data/hashtags-dev.txt.gz")]
    pub target: PathBuf,

    /// Arquivo de saída (tokens separados por espaço, uma linha por entrada)
    #[arg(long, value_name = "FILE", default_value = "out.txt")]
    pub output: PathBuf,

    /// Léxico ranqueado (`palavra<TAB>frequência`, mais frequente primeiro)
    #[arg(long, value_name = "FILE", default_value = "data/bigwordlist.txt.gz")]
    pub lexicon: PathBuf,

    /// Número máximo de palavras lidas do léxico
    #[arg(long, default_value_t = 75_000, env = "MAXMATCH_LIMIT")]
    pub limit: usize,

    /// Segmentação de referência, alinhada linha a linha com o alvo
    #[arg(long, value_name = "FILE")]
    pub refer: Option<PathBuf>,

    /// Usa Backward Maximum Matching
    #[arg(long, conflicts_with = "fb")]
    pub bk: bool,

    /// Usa Front-Back Maximum Matching
    #[arg(long)]
    pub fb: bool,

    /// Acrescenta palavras recentes ausentes do léxico
    #[arg(long)]
    pub ew: bool,

    /// Recheck de palavras curtas
    #[arg(long)]
    pub sw: bool,

    /// Divide tokens compostos pela tabela de divisão
    #[arg(long)]
    pub st: bool,
}

impl Cli {
    pub fn strategy(&self) -> MatchStrategy {
        if self.fb {
            MatchStrategy::FrontBack
        } else if self.bk {
            MatchStrategy::Backward
        } else {
            MatchStrategy::Forward
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            extra_words: self.ew,
            short_words: self.sw,
            split_tokens: self.st,
        }
    }
}

/// Executa a segmentação do arquivo alvo e devolve o resumo da WER.
pub fn run(cli: &Cli) -> Result<WerSummary> {
    let words = read_lines(&cli.lexicon)?
        .iter()
        .filter_map(|line| parse_lexicon_line(line))
        .collect::<Vec<_>>();
    let params = TableDefaults {
        lexicon_limit: cli.limit,
        ..TableDefaults::default()
    };
    let segmenter = Segmenter::from_ranked_words(&words, &params, cli.build_options())
        .with_context(|| format!("falha ao montar o segmentador a partir de {}", cli.lexicon.display()))?;
    info!(
        words = segmenter.lexicon().len(),
        max_word_len = segmenter.lexicon().max_word_len(),
        strategy = %cli.strategy(),
        "léxico carregado"
    );

    let targets = read_lines(&cli.target)?;
    let references = cli.refer.as_deref().map(read_lines).transpose()?;

    let file = File::create(&cli.output)
        .with_context(|| format!("falha ao criar arquivo de saída: {}", cli.output.display()))?;
    let mut out = BufWriter::new(file);

    // As correções só rodam se as tabelas foram montadas (--sw / --st)
    let options = SegmentOptions::with_strategy(cli.strategy());
    let mut summary = WerSummary::new();

    for (line_no, line) in targets.iter().enumerate() {
        let tokens = segmenter.segment_with(&clean_line(line), options).tokens;
        debug!(line = line_no + 1, ?tokens, "linha segmentada");

        if let Some(references) = &references {
            let reference = references
                .get(line_no)
                .map(|r| parse_reference_line(r))
                .unwrap_or_default();
            if let Err(err) = summary.record(maxmatch_core::word_error_rate(&tokens, &reference)) {
                warn!(line = line_no + 1, "WER não calculada: {err}");
            }
        }

        writeln!(out, "{}", tokens.join(" "))
            .with_context(|| format!("falha ao escrever em {}", cli.output.display()))?;
    }
    out.flush()
        .with_context(|| format!("falha ao escrever em {}", cli.output.display()))?;

    info!(lines = targets.len(), output = %cli.output.display(), "segmentação concluída");
    Ok(summary)
}

/// Lê as linhas de um arquivo texto; caminhos terminados em `gz` são descomprimidos.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("falha ao ler {}", path.display()))?;
    let reader: Box<dyn BufRead> = if is_gzip(path) {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("falha ao ler {}", path.display()))
}

fn is_gzip(path: &Path) -> bool {
    path.to_string_lossy().ends_with("gz")
}
