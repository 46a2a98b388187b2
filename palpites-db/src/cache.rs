use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, Game};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS snapshots (
    game        TEXT PRIMARY KEY,
    payload     TEXT NOT NULL,
    fetched_at  INTEGER NOT NULL
);
";

pub fn cache_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("palpites.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossível criar o diretório {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossível abrir o cache {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Falha na migração do cache")?;
    Ok(())
}

/// Grava (ou substitui) o snapshot de um jogo. `fetched_at` é o instante da
/// busca em segundos Unix, injetado pelo chamador.
pub fn store_snapshot(conn: &Connection, game: Game, draws: &[Draw], fetched_at: i64) -> Result<()> {
    let payload = serde_json::to_string(draws).context("Falha ao serializar o snapshot")?;
    conn.execute(
        "INSERT OR REPLACE INTO snapshots (game, payload, fetched_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![game.slug(), payload, fetched_at],
    )
    .context("Falha ao gravar o snapshot")?;
    Ok(())
}

/// Snapshot ainda dentro da validade, ou None se ausente/expirado.
/// Política: rebuscar quando now - fetched_at excede o TTL.
pub fn load_snapshot(conn: &Connection, game: Game, now: i64, ttl_secs: i64) -> Result<Option<Vec<Draw>>> {
    match load_snapshot_stale(conn, game)? {
        Some((draws, fetched_at)) if now - fetched_at <= ttl_secs => Ok(Some(draws)),
        _ => Ok(None),
    }
}

/// Snapshot sem olhar a validade, com o instante em que foi buscado.
/// Usado como último recurso quando a API está fora do ar.
pub fn load_snapshot_stale(conn: &Connection, game: Game) -> Result<Option<(Vec<Draw>, i64)>> {
    let mut stmt = conn.prepare("SELECT payload, fetched_at FROM snapshots WHERE game = ?1")?;
    let mut rows = stmt.query_map([game.slug()], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    match rows.next() {
        Some(row) => {
            let (payload, fetched_at) = row?;
            let draws: Vec<Draw> =
                serde_json::from_str(&payload).context("Snapshot corrompido no cache")?;
            Ok(Some((draws, fetched_at)))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draws() -> Vec<Draw> {
        vec![
            Draw {
                draw_number: 2,
                draw_date: None,
                numbers: vec![7, 9, 21, 33, 45, 58],
                secondary: Vec::new(),
                category: None,
                accumulated: false,
                winner_count: 1,
                winner_prize: 10_000_000.0,
            },
            Draw {
                draw_number: 1,
                draw_date: None,
                numbers: vec![1, 2, 3, 4, 5, 6],
                secondary: Vec::new(),
                category: None,
                accumulated: true,
                winner_count: 0,
                winner_prize: 0.0,
            },
        ]
    }

    #[test]
    fn test_snapshot_fresco_e_carregado() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        store_snapshot(&conn, Game::MegaSena, &test_draws(), 1000).unwrap();
        let loaded = load_snapshot(&conn, Game::MegaSena, 1500, 3600).unwrap();
        let loaded = loaded.expect("snapshot dentro da validade");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].draw_number, 2);
        assert_eq!(loaded[0].numbers, vec![7, 9, 21, 33, 45, 58]);
    }

    #[test]
    fn test_snapshot_expirado_nao_e_carregado() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        store_snapshot(&conn, Game::Quina, &test_draws(), 1000).unwrap();
        assert!(load_snapshot(&conn, Game::Quina, 1000 + 3601, 3600).unwrap().is_none());
    }

    #[test]
    fn test_snapshot_vencido_ainda_acessivel_como_stale() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        store_snapshot(&conn, Game::Quina, &test_draws(), 1000).unwrap();
        let (draws, fetched_at) = load_snapshot_stale(&conn, Game::Quina).unwrap().unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(fetched_at, 1000);
    }

    #[test]
    fn test_jogo_sem_snapshot() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert!(load_snapshot(&conn, Game::Lotofacil, 100, 3600).unwrap().is_none());
        assert!(load_snapshot_stale(&conn, Game::Lotofacil).unwrap().is_none());
    }

    #[test]
    fn test_regravar_substitui_o_snapshot() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        store_snapshot(&conn, Game::MegaSena, &test_draws(), 1000).unwrap();
        let only_one = vec![test_draws().remove(0)];
        store_snapshot(&conn, Game::MegaSena, &only_one, 2000).unwrap();

        let (draws, fetched_at) = load_snapshot_stale(&conn, Game::MegaSena).unwrap().unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(fetched_at, 2000);
    }

    #[test]
    fn test_snapshots_por_jogo_sao_independentes() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        store_snapshot(&conn, Game::MegaSena, &test_draws(), 1000).unwrap();
        assert!(load_snapshot(&conn, Game::Quina, 1000, 3600).unwrap().is_none());
    }
}
