use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use palpites_db::models::{Draw, GameProfile, Secondary, MONTHS};

use super::{number_frequency, recent_numbers, secondary_frequency};

/// Janela de concursos usada para classificar uma dezena como atrasada.
/// Valor herdado do comportamento histórico, sem evidência de ajuste fino.
pub const RECENT_DRAW_WINDOW: usize = 10;

/// O pool das estratégias de frequência guarda round(2.5 × dezenas por aposta).
const POOL_FACTOR: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Strategy {
    /// Dezenas mais frequentes do histórico
    MaisFrequentes,
    /// Mistura de dezenas frequentes e intermediárias
    Equilibrada,
    /// Prioriza dezenas ausentes dos concursos recentes
    Atrasadas,
    /// Sorteio uniforme puro
    Aleatoria,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::MaisFrequentes,
        Strategy::Equilibrada,
        Strategy::Atrasadas,
        Strategy::Aleatoria,
    ];
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::MaisFrequentes => write!(f, "mais frequentes"),
            Strategy::Equilibrada => write!(f, "equilibrada"),
            Strategy::Atrasadas => write!(f, "atrasadas"),
            Strategy::Aleatoria => write!(f, "aleatória"),
        }
    }
}

/// Um palpite: dezenas ordenadas e distintas, mais o conjunto secundário
/// quando o perfil do jogo declara um.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub numbers: Vec<u8>,
    pub secondary: Vec<u8>,
    pub category: Option<String>,
    pub strategy: Strategy,
}

/// Gera `count` palpites independentes. A estratégia de cada palpite é
/// sorteada uniformemente entre as quatro, salvo quando `forced` fixa uma.
/// O perfil já chega validado: aqui nenhuma inconsistência é possível.
pub fn generate(
    draws: &[Draw],
    profile: &GameProfile,
    count: usize,
    seed: Option<u64>,
    forced: Option<Strategy>,
) -> Vec<Suggestion> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let k = profile.numbers_per_ticket;
    let ranked = rank_by_frequency(&number_frequency(draws, profile.max_number));
    let pool_len = ((POOL_FACTOR * k as f64).round() as usize)
        .max(k)
        .min(ranked.len());

    let overdue: Vec<u8> = {
        let recent = recent_numbers(draws, RECENT_DRAW_WINDOW);
        (1..=profile.max_number).filter(|n| !recent.contains(n)).collect()
    };

    let sec_ranked: Vec<u8> = match profile.secondary {
        Some(Secondary::Numbers { max, .. }) => {
            rank_by_frequency(&secondary_frequency(draws, max))
        }
        _ => Vec::new(),
    };

    let team_domain: Vec<String> = match profile.secondary {
        Some(Secondary::Teams) => {
            let mut teams: Vec<String> = draws
                .iter()
                .filter_map(|d| d.category.clone())
                .collect::<std::collections::HashSet<_>>()
                .into_iter()
                .collect();
            teams.sort_unstable();
            teams
        }
        _ => Vec::new(),
    };

    (0..count)
        .map(|_| {
            let strategy =
                forced.unwrap_or_else(|| Strategy::ALL[rng.random_range(0..Strategy::ALL.len())]);

            let numbers = match strategy {
                Strategy::MaisFrequentes => top_frequency(&ranked, pool_len, k, &mut rng),
                Strategy::Equilibrada => balanced(&ranked, k, &mut rng),
                Strategy::Atrasadas => overdue_pick(&ranked, pool_len, &overdue, k, &mut rng),
                Strategy::Aleatoria => pure_random(profile.max_number, k, &mut rng),
            };

            let (secondary, category) =
                pick_secondary(profile, &sec_ranked, &team_domain, &mut rng);

            Suggestion {
                numbers,
                secondary,
                category,
                strategy,
            }
        })
        .collect()
}

/// Dezenas 1..=max ordenadas por frequência decrescente; empate resolvido
/// pela dezena menor (ordem consistente, o pool é embaralhado depois).
fn rank_by_frequency(counts: &[u32]) -> Vec<u8> {
    let mut ranked: Vec<u8> = (1..=counts.len() as u8).collect();
    ranked.sort_by(|&a, &b| {
        counts[(b - 1) as usize]
            .cmp(&counts[(a - 1) as usize])
            .then(a.cmp(&b))
    });
    ranked
}

fn top_frequency(ranked: &[u8], pool_len: usize, k: usize, rng: &mut StdRng) -> Vec<u8> {
    let mut pool = ranked[..pool_len].to_vec();
    pool.shuffle(rng);
    pool.truncate(k);
    pool.sort_unstable();
    pool
}

fn balanced(ranked: &[u8], k: usize, rng: &mut StdRng) -> Vec<u8> {
    let third = ranked.len() / 3;
    let mut frequent = ranked[..third].to_vec();
    let mut mid = ranked[third..(2 * third).min(ranked.len())].to_vec();
    frequent.shuffle(rng);
    mid.shuffle(rng);

    let first_half = k / 2;
    let mut selected: Vec<u8> = Vec::with_capacity(k);
    selected.extend(frequent.iter().take(first_half));
    selected.extend(mid.iter().take(k - first_half));

    top_up(&mut selected, ranked, k);
    selected.sort_unstable();
    selected
}

fn overdue_pick(
    ranked: &[u8],
    pool_len: usize,
    overdue: &[u8],
    k: usize,
    rng: &mut StdRng,
) -> Vec<u8> {
    let mut selected = overdue.to_vec();
    selected.shuffle(rng);
    selected.truncate(k / 2);

    // O restante vem do pool de frequentes; falta de atrasadas é absorvida
    // em silêncio, a aposta sai sempre com k dezenas.
    let mut pool: Vec<u8> = ranked[..pool_len]
        .iter()
        .copied()
        .filter(|n| !selected.contains(n))
        .collect();
    pool.shuffle(rng);
    for n in pool {
        if selected.len() == k {
            break;
        }
        selected.push(n);
    }

    top_up(&mut selected, ranked, k);
    selected.sort_unstable();
    selected
}

fn pure_random(max_number: u8, k: usize, rng: &mut StdRng) -> Vec<u8> {
    let mut all: Vec<u8> = (1..=max_number).collect();
    all.shuffle(rng);
    all.truncate(k);
    all.sort_unstable();
    all
}

/// Completa a seleção com as melhores dezenas do ranking ainda não usadas.
fn top_up(selected: &mut Vec<u8>, ranked: &[u8], k: usize) {
    for &n in ranked {
        if selected.len() == k {
            break;
        }
        if !selected.contains(&n) {
            selected.push(n);
        }
    }
}

fn pick_secondary(
    profile: &GameProfile,
    sec_ranked: &[u8],
    team_domain: &[String],
    rng: &mut StdRng,
) -> (Vec<u8>, Option<String>) {
    match profile.secondary {
        Some(Secondary::Numbers { count, .. }) => {
            let mut pool = sec_ranked.to_vec();
            pool.shuffle(rng);
            pool.truncate(count);
            pool.sort_unstable();
            (pool, None)
        }
        Some(Secondary::Months) => {
            let month = MONTHS[rng.random_range(0..MONTHS.len())];
            (Vec::new(), Some(month.to_string()))
        }
        Some(Secondary::Teams) => {
            let cat = if team_domain.is_empty() {
                None
            } else {
                Some(team_domain[rng.random_range(0..team_domain.len())].clone())
            };
            (Vec::new(), cat)
        }
        None => (Vec::new(), None),
    }
}
