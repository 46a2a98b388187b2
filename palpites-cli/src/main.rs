mod analysis;
mod display;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use reqwest::blocking::Client;

use crate::analysis::generator::{generate, Strategy};
use crate::analysis::{category_frequency, frequency_stats, position_matrix, secondary_frequency};
use crate::display::{
    display_categories, display_counts, display_draws, display_games, display_heatmap,
    display_stats, display_suggestions,
};
use palpites_db::api::fetch_draws;
use palpites_db::cache::{
    cache_path, load_snapshot, load_snapshot_stale, migrate, open_db, store_snapshot,
};
use palpites_db::models::{Draw, Game, Secondary};

#[derive(Parser)]
#[command(name = "palpites", about = "Análise e palpites para as loterias da Caixa")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Listar os jogos suportados e seus perfis
    Jogos,

    /// Exibir os concursos mais recentes
    Resultados {
        /// Jogo (ex: megasena, quina, maismilionaria)
        jogo: Game,

        /// Quantidade de concursos a exibir
        #[arg(short, long, default_value = "10")]
        last: usize,

        /// Validade do cache em minutos
        #[arg(long, default_value = "60")]
        ttl: u64,
    },

    /// Frequência histórica das dezenas (e do conjunto secundário)
    Frequencia {
        /// Jogo (ex: megasena, quina, maismilionaria)
        jogo: Game,

        /// Janela de análise em concursos (padrão: todo o histórico)
        #[arg(short, long)]
        janela: Option<usize>,

        /// Validade do cache em minutos
        #[arg(long, default_value = "60")]
        ttl: u64,
    },

    /// Mapa de calor dezena × posição do sorteio
    Mapa {
        /// Jogo (ex: megasena, quina, maismilionaria)
        jogo: Game,

        /// Validade do cache em minutos
        #[arg(long, default_value = "60")]
        ttl: u64,
    },

    /// Gerar palpites
    Gerar {
        /// Jogo (ex: megasena, quina, maismilionaria)
        jogo: Game,

        /// Quantidade de palpites
        #[arg(short, long, default_value = "5")]
        qtd: usize,

        /// Fixar uma estratégia (padrão: sorteada por palpite)
        #[arg(short, long)]
        estrategia: Option<Strategy>,

        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,

        /// Validade do cache em minutos
        #[arg(long, default_value = "60")]
        ttl: u64,
    },

    /// Forçar a atualização do snapshot de um jogo
    Atualizar {
        /// Jogo (ex: megasena, quina, maismilionaria)
        jogo: Game,
    },

    /// Exibir o caminho do cache local
    DbPath,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cache_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Jogos => {
            display_games();
            Ok(())
        }
        Command::Resultados { jogo, last, ttl } => cmd_resultados(&conn, jogo, last, ttl),
        Command::Frequencia { jogo, janela, ttl } => cmd_frequencia(&conn, jogo, janela, ttl),
        Command::Mapa { jogo, ttl } => cmd_mapa(&conn, jogo, ttl),
        Command::Gerar {
            jogo,
            qtd,
            estrategia,
            seed,
            ttl,
        } => cmd_gerar(&conn, jogo, qtd, estrategia, seed, ttl),
        Command::Atualizar { jogo } => cmd_atualizar(&conn, jogo),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Cache read-through: snapshot dentro da validade evita a rede; API fora
/// do ar degrada para o snapshot vencido ou, em último caso, para o vazio.
/// A análise nunca aborta por indisponibilidade do Result Store.
fn load_results(
    conn: &palpites_db::rusqlite::Connection,
    game: Game,
    ttl_min: u64,
    force: bool,
) -> Result<Vec<Draw>> {
    let now = Utc::now().timestamp();
    let ttl_secs = (ttl_min * 60) as i64;

    if !force {
        if let Some(draws) = load_snapshot(conn, game, now, ttl_secs)? {
            return Ok(draws);
        }
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Consultando a API ({})...", game.slug()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Impossível montar o cliente HTTP")?;

    match fetch_draws(&client, game) {
        Ok(draws) => {
            spinner.finish_and_clear();
            store_snapshot(conn, game, &draws, now)?;
            Ok(draws)
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("Aviso: resultados indisponíveis ({e}).");
            match load_snapshot_stale(conn, game)? {
                Some((draws, fetched_at)) => {
                    let quando = chrono::DateTime::from_timestamp(fetched_at, 0)
                        .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
                        .unwrap_or_else(|| "data desconhecida".to_string());
                    eprintln!("Usando snapshot local de {} (pode estar desatualizado).", quando);
                    Ok(draws)
                }
                None => {
                    eprintln!("Nenhum snapshot local: a análise seguirá sem resultados.");
                    Ok(Vec::new())
                }
            }
        }
    }
}

fn cmd_resultados(
    conn: &palpites_db::rusqlite::Connection,
    jogo: Game,
    last: usize,
    ttl: u64,
) -> Result<()> {
    let draws = load_results(conn, jogo, ttl, false)?;
    display_draws(&draws[..last.min(draws.len())], jogo);
    Ok(())
}

fn cmd_frequencia(
    conn: &palpites_db::rusqlite::Connection,
    jogo: Game,
    janela: Option<usize>,
    ttl: u64,
) -> Result<()> {
    let mut draws = load_results(conn, jogo, ttl, false)?;
    if draws.is_empty() {
        println!("Nenhum resultado disponível para {}.", jogo.name());
        return Ok(());
    }
    if let Some(n) = janela {
        draws.truncate(n);
    }

    let profile = jogo.profile();
    let stats = frequency_stats(&draws, profile.max_number);
    display_stats(&stats, draws.len(), &format!("Frequência das dezenas — {}", jogo.name()));

    match profile.secondary {
        Some(Secondary::Numbers { max, .. }) => {
            let counts = secondary_frequency(&draws, max);
            let label = display::secondary_label(jogo).unwrap_or("Secundário");
            display_counts(&counts, label);
        }
        Some(Secondary::Months) | Some(Secondary::Teams) => {
            let counts = category_frequency(&draws);
            let label = display::secondary_label(jogo).unwrap_or("Categoria");
            display_categories(&counts, label);
        }
        None => {}
    }

    Ok(())
}

fn cmd_mapa(conn: &palpites_db::rusqlite::Connection, jogo: Game, ttl: u64) -> Result<()> {
    let draws = load_results(conn, jogo, ttl, false)?;
    if draws.is_empty() {
        println!("Nenhum resultado disponível para {}.", jogo.name());
        return Ok(());
    }

    let profile = jogo.profile();
    let matrix = position_matrix(&draws, &profile)?;
    display_heatmap(&matrix, draws.len());
    Ok(())
}

fn cmd_gerar(
    conn: &palpites_db::rusqlite::Connection,
    jogo: Game,
    qtd: usize,
    estrategia: Option<Strategy>,
    seed: Option<u64>,
    ttl: u64,
) -> Result<()> {
    if qtd == 0 {
        bail!("quantidade de palpites deve ser ao menos 1");
    }

    let draws = load_results(conn, jogo, ttl, false)?;
    let profile = jogo.profile();

    let suggestions = generate(&draws, &profile, qtd, seed, estrategia);
    display_suggestions(&suggestions, jogo);

    println!("Palpites gerados sobre {} concursos. Jogue com responsabilidade.", draws.len());
    Ok(())
}

fn cmd_atualizar(conn: &palpites_db::rusqlite::Connection, jogo: Game) -> Result<()> {
    let draws = load_results(conn, jogo, 0, true)?;
    println!("Snapshot de {} atualizado: {} concursos.", jogo.name(), draws.len());
    Ok(())
}
