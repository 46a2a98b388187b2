use reqwest::blocking::Client;
use serde::Deserialize;

use crate::models::{Draw, Game};

pub const BASE_URL: &str = "https://loteriascaixa-api.herokuapp.com/api";

/// Falhas do Result Store. Qualquer variante significa "API indisponível
/// nesta requisição": quem chama decide como degradar, nunca aborta a análise.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("falha de rede ao consultar a API: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API respondeu status {0}")]
    Status(reqwest::StatusCode),
    #[error("resposta da API em formato inesperado: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ApiPrize {
    #[serde(default)]
    ganhadores: u32,
    #[serde(default, rename = "valorPremio")]
    valor_premio: f64,
}

#[derive(Debug, Deserialize)]
struct ApiDraw {
    concurso: u32,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    dezenas: Vec<String>,
    #[serde(default)]
    trevos: Vec<String>,
    #[serde(default, rename = "dezenasSegundoSorteio")]
    dezenas_segundo_sorteio: Vec<String>,
    #[serde(default, rename = "timeCoracao")]
    time_coracao: Option<String>,
    #[serde(default, rename = "mesSorte")]
    mes_sorte: Option<String>,
    #[serde(default)]
    acumulou: bool,
    #[serde(default)]
    premiacoes: Vec<ApiPrize>,
}

// A API serve a lista diretamente; versões antigas embrulhavam em {"data": [...]}.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Plain(Vec<ApiDraw>),
    Wrapped { data: Vec<ApiDraw> },
}

/// Busca o histórico completo de um jogo. Resultado ordenado do concurso
/// mais recente para o mais antigo.
pub fn fetch_draws(client: &Client, game: Game) -> Result<Vec<Draw>, StoreError> {
    let url = format!("{}/{}", BASE_URL, game.slug());
    let resp = client.get(&url).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(StoreError::Status(status));
    }
    let body = resp.text()?;
    parse_payload(&body)
}

fn parse_payload(body: &str) -> Result<Vec<Draw>, StoreError> {
    let payload: Payload = serde_json::from_str(body)?;
    let raw = match payload {
        Payload::Plain(v) => v,
        Payload::Wrapped { data } => data,
    };
    let mut draws: Vec<Draw> = raw.into_iter().filter_map(convert).collect();
    draws.sort_by(|a, b| b.draw_number.cmp(&a.draw_number));
    Ok(draws)
}

fn parse_numbers(raw: &[String]) -> Vec<u8> {
    raw.iter().filter_map(|s| s.trim().parse::<u8>().ok()).collect()
}

fn convert(raw: ApiDraw) -> Option<Draw> {
    let numbers = parse_numbers(&raw.dezenas);
    if numbers.is_empty() {
        // Registro sem dezenas aproveitáveis não entra no snapshot.
        return None;
    }

    // Trevos e 2º sorteio nunca coexistem no mesmo jogo.
    let mut secondary = parse_numbers(&raw.trevos);
    if secondary.is_empty() {
        secondary = parse_numbers(&raw.dezenas_segundo_sorteio);
    }

    // Data ilegível é ausência de dado, não erro.
    let draw_date = raw
        .data
        .as_deref()
        .and_then(|d| chrono::NaiveDate::parse_from_str(d.trim(), "%d/%m/%Y").ok());

    let (winner_count, winner_prize) = raw
        .premiacoes
        .first()
        .map(|p| (p.ganhadores, p.valor_premio))
        .unwrap_or((0, 0.0));

    Some(Draw {
        draw_number: raw.concurso,
        draw_date,
        numbers,
        secondary,
        category: raw.time_coracao.or(raw.mes_sorte),
        accumulated: raw.acumulou,
        winner_count,
        winner_prize,
    })
}
