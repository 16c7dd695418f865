use anyhow::Result;
use cinesearch_core::{
    build_index, load_corpus, matched_terms, rank_with_total, search, Corpus, RankParams, RankedResult,
    SearchRequest, DEFAULT_TOP_N,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

const CAST_PREVIEW: usize = 3;

#[derive(Parser)]
#[command(name = "cinesearch")]
#[command(about = "Search a movie corpus by cast member or by description", long_about = None)]
struct Cli {
    /// Corpus path (.json, .jsonl, or a directory of them)
    #[arg(long, global = true, default_value = "./data/movies.json")]
    corpus: String,
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find movies whose cast contains a name (case-insensitive)
    Actor {
        name: String,
    },
    /// Rank movies by how closely their overview matches a description
    Describe {
        query: String,
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
    /// List the terms admitted to the similarity vocabulary
    Vocab {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct DescribeOutput<'a> {
    matched_terms: Vec<String>,
    total_hits: usize,
    results: Vec<RankedResult<'a>>,
}

#[derive(Serialize)]
struct TermRow<'a> {
    term: &'a str,
    df: u32,
    idf: f32,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let corpus = load_corpus(&cli.corpus)?;

    match cli.command {
        Commands::Actor { name } => {
            let request = SearchRequest::from_inputs(Some(name.as_str()), None)?;
            run_search(&corpus, request, RankParams::default(), cli.json)
        }
        Commands::Describe { query, top_n } => {
            SearchRequest::from_inputs(None, Some(query.as_str()))?;
            run_describe(&corpus, &query, RankParams::with_top_n(top_n), cli.json)
        }
        Commands::Vocab { limit } => print_vocab(&corpus, limit, cli.json),
    }
}

fn run_search(corpus: &Corpus, request: SearchRequest, params: RankParams, json: bool) -> Result<()> {
    let results = search(corpus, &request, params);
    tracing::info!(mode = request.mode(), hits = results.len(), "search finished");
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render(&results));
    }
    Ok(())
}

fn run_describe(corpus: &Corpus, query: &str, params: RankParams, json: bool) -> Result<()> {
    let index = build_index(corpus);
    let ranking = rank_with_total(corpus, &index, query, params);
    let matched = matched_terms(index.vocabulary(), query);
    tracing::info!(hits = ranking.results.len(), total_hits = ranking.total_hits, "search finished");
    if json {
        let out = DescribeOutput { matched_terms: matched, total_hits: ranking.total_hits, results: ranking.results };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_matched(&matched));
        print!("{}", render(&ranking.results));
    }
    Ok(())
}

fn render_matched(terms: &[String]) -> String {
    if terms.is_empty() {
        "matched terms: (none in vocabulary)\n".to_string()
    } else {
        format!("matched terms: {}\n", terms.join(", "))
    }
}

fn print_vocab(corpus: &Corpus, limit: Option<usize>, json: bool) -> Result<()> {
    let index = build_index(corpus);
    let vocab = index.vocabulary();
    let rows: Vec<TermRow> = vocab
        .terms()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(tid, term)| TermRow {
            term,
            df: vocab.df(tid).unwrap_or(0),
            idf: vocab.idf(tid).unwrap_or(0.0),
        })
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{} terms over {} movies", vocab.len(), corpus.len());
        for r in rows {
            println!("{:>4}  {:.3}  {}", r.df, r.idf, r.term);
        }
    }
    Ok(())
}

fn render(results: &[RankedResult<'_>]) -> String {
    if results.is_empty() {
        return "No movies found matching your search\n".to_string();
    }
    let mut out = String::new();
    for hit in results {
        let doc = hit.document;
        let mut cast: Vec<&str> = doc.cast.iter().take(CAST_PREVIEW).map(String::as_str).collect();
        if doc.cast.len() > CAST_PREVIEW {
            cast.push("...");
        }
        out.push_str(&format!(
            "{:>5.1}%  {:>8}  {}  [{}]\n",
            hit.score * 100.0,
            doc.id,
            doc.title,
            cast.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinesearch_core::Document;

    #[test]
    fn render_empty() {
        assert_eq!(render(&[]), "No movies found matching your search\n");
    }

    #[test]
    fn describe_reports_matched_vocabulary_terms() {
        let corpus = Corpus::new(vec![
            Document::new(1, "Night Beat", "A young detective hunts a killer in a dark city", ["Ann Lee"]),
            Document::new(2, "Last Case", "A retired detective returns to the dark city streets", ["Bob Ray"]),
            Document::new(3, "Eight Legs", "Giant spiders attack a small desert town", ["Annie Cole"]),
        ])
        .unwrap();
        let index = build_index(&corpus);
        let matched = matched_terms(index.vocabulary(), "Dark city detective with a zebra");
        assert_eq!(matched, vec!["dark", "city", "detective", "dark city"]);
        assert_eq!(render_matched(&matched), "matched terms: dark, city, detective, dark city\n");
        assert_eq!(render_matched(&[]), "matched terms: (none in vocabulary)\n");
    }

    #[test]
    fn render_truncates_cast() {
        let doc = Document::new(603, "The Matrix", "", ["A", "B", "C", "D"]);
        let out = render(&[RankedResult { document: &doc, score: 1.0 }]);
        assert_eq!(out, "100.0%       603  The Matrix  [A, B, C, ...]\n");
    }
}
