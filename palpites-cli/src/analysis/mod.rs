pub mod generator;

use std::collections::HashSet;

use anyhow::{bail, Result};
use palpites_db::models::{Draw, GameProfile};

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}

/// Contagem de ocorrências por dezena sobre todo o snapshot.
/// Índice 0 corresponde à dezena 1; valores fora de 1-max são ignorados.
pub fn number_frequency(draws: &[Draw], max_number: u8) -> Vec<u32> {
    count_occurrences(draws.iter().flat_map(|d| d.numbers.iter().copied()), max_number)
}

/// Mesma contagem, aplicada ao conjunto secundário (trevos, 2º sorteio).
pub fn secondary_frequency(draws: &[Draw], max: u8) -> Vec<u32> {
    count_occurrences(draws.iter().flat_map(|d| d.secondary.iter().copied()), max)
}

fn count_occurrences(numbers: impl Iterator<Item = u8>, max: u8) -> Vec<u32> {
    let mut counts = vec![0u32; max as usize];
    for n in numbers {
        if n >= 1 {
            let idx = (n - 1) as usize;
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }
    counts
}

/// Ocorrências do campo categórico (time do coração, mês da sorte),
/// ordenadas da mais frequente para a menos frequente.
pub fn category_frequency(draws: &[Draw]) -> Vec<(String, u32)> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    for cat in draws.iter().filter_map(|d| d.category.as_deref()) {
        match counts.iter_mut().find(|(c, _)| c == cat) {
            Some((_, n)) => *n += 1,
            None => counts.push((cat.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    counts
}

/// Frequência e atraso (concursos desde a última aparição) por dezena.
/// `draws[0]` deve ser o concurso mais recente.
pub fn frequency_stats(draws: &[Draw], max_number: u8) -> Vec<NumberStats> {
    let mut stats: Vec<NumberStats> = (1..=max_number)
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
        })
        .collect();

    for (i, draw) in draws.iter().enumerate() {
        for &n in &draw.numbers {
            if n < 1 {
                continue;
            }
            let idx = (n - 1) as usize;
            if idx < stats.len() {
                stats[idx].frequency += 1;
                if stats[idx].gap == 0 {
                    stats[idx].gap = i as u32;
                }
            }
        }
    }

    for stat in &mut stats {
        if stat.frequency == 0 {
            stat.gap = draws.len() as u32;
        }
    }

    stats
}

/// Matriz posição × dezena: quantas vezes a dezena n saiu na posição p do
/// sorteio, na ordem devolvida pela API. Linha 0 corresponde à dezena 1.
/// Exige comprimento uniforme: um concurso fora do perfil é erro.
pub fn position_matrix(draws: &[Draw], profile: &GameProfile) -> Result<Vec<Vec<u32>>> {
    let cols = profile.numbers_per_ticket;
    let mut matrix = vec![vec![0u32; cols]; profile.max_number as usize];

    for draw in draws {
        if draw.numbers.len() != cols {
            bail!(
                "concurso {} tem {} dezenas, esperado {}",
                draw.draw_number,
                draw.numbers.len(),
                cols
            );
        }
        for (pos, &n) in draw.numbers.iter().enumerate() {
            if n >= 1 && (n as usize) <= matrix.len() {
                matrix[(n - 1) as usize][pos] += 1;
            }
        }
    }

    Ok(matrix)
}

/// Dezenas presentes em algum dos `window` concursos mais recentes
/// (por número do concurso, decrescente). Com histórico menor que a
/// janela, considera todos os concursos disponíveis.
pub fn recent_numbers(draws: &[Draw], window: usize) -> HashSet<u8> {
    let mut by_recency: Vec<&Draw> = draws.iter().collect();
    by_recency.sort_by(|a, b| b.draw_number.cmp(&a.draw_number));

    by_recency
        .iter()
        .take(window)
        .flat_map(|d| d.numbers.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use palpites_db::models::Game;

    fn draw(draw_number: u32, numbers: Vec<u8>) -> Draw {
        Draw {
            draw_number,
            draw_date: None,
            numbers,
            secondary: Vec::new(),
            category: None,
            accumulated: false,
            winner_count: 0,
            winner_prize: 0.0,
        }
    }

    #[test]
    fn test_frequencia_cenario_de_referencia() {
        let draws = vec![
            draw(1, vec![1, 2, 3, 4, 5, 6]),
            draw(2, vec![1, 2, 3, 7, 8, 9]),
        ];
        let counts = number_frequency(&draws, 10);
        assert_eq!(counts[..9], [2, 2, 2, 1, 1, 1, 1, 1, 1]);
        assert_eq!(counts[9], 0);
    }

    #[test]
    fn test_soma_das_frequencias_igual_ao_total_de_dezenas() {
        let draws = vec![
            draw(1, vec![1, 2, 3, 4, 5, 6]),
            draw(2, vec![10, 20, 30, 40, 50, 60]),
            draw(3, vec![7, 7, 7, 7, 7, 7]),
        ];
        let counts = number_frequency(&draws, 60);
        let total: u32 = counts.iter().sum();
        let esperado: usize = draws.iter().map(|d| d.numbers.len()).sum();
        assert_eq!(total as usize, esperado);
    }

    #[test]
    fn test_snapshot_vazio_produz_tabela_vazia() {
        let counts = number_frequency(&[], 60);
        assert_eq!(counts.len(), 60);
        assert_eq!(counts.iter().sum::<u32>(), 0);
    }

    #[test]
    fn test_dezenas_fora_do_intervalo_sao_ignoradas() {
        let draws = vec![draw(1, vec![0, 1, 61, 200])];
        let counts = number_frequency(&draws, 60);
        assert_eq!(counts.iter().sum::<u32>(), 1);
        assert_eq!(counts[0], 1);
    }

    #[test]
    fn test_agregador_e_idempotente() {
        let draws = vec![
            draw(1, vec![1, 2, 3, 4, 5, 6]),
            draw(2, vec![1, 2, 3, 7, 8, 9]),
        ];
        let a = number_frequency(&draws, 60);
        let b = number_frequency(&draws, 60);
        assert_eq!(a, b, "mesmo snapshot deve dar a mesma tabela");
    }

    #[test]
    fn test_frequencia_secundaria() {
        let mut d1 = draw(1, vec![1, 2, 3, 4, 5, 6]);
        d1.secondary = vec![2, 5];
        let mut d2 = draw(2, vec![7, 8, 9, 10, 11, 12]);
        d2.secondary = vec![2, 6];
        let counts = secondary_frequency(&[d1, d2], 6);
        assert_eq!(counts, vec![0, 2, 0, 0, 1, 1]);
    }

    #[test]
    fn test_frequencia_categorica() {
        let mut d1 = draw(1, vec![1]);
        d1.category = Some("FLAMENGO/RJ".to_string());
        let mut d2 = draw(2, vec![2]);
        d2.category = Some("SANTOS/SP".to_string());
        let mut d3 = draw(3, vec![3]);
        d3.category = Some("FLAMENGO/RJ".to_string());
        let d4 = draw(4, vec![4]);

        let counts = category_frequency(&[d1, d2, d3, d4]);
        assert_eq!(counts[0], ("FLAMENGO/RJ".to_string(), 2));
        assert_eq!(counts[1], ("SANTOS/SP".to_string(), 1));
    }

    #[test]
    fn test_atraso_por_dezena() {
        // draws[0] = mais recente.
        let draws = vec![
            draw(3, vec![1, 2]),
            draw(2, vec![3, 4]),
            draw(1, vec![1, 5]),
        ];
        let stats = frequency_stats(&draws, 6);
        assert_eq!(stats[0].gap, 0, "dezena 1 saiu no concurso mais recente");
        assert_eq!(stats[2].gap, 1, "dezena 3 saiu há um concurso");
        assert_eq!(stats[4].gap, 2);
        assert_eq!(stats[5].gap, 3, "dezena 6 nunca saiu: atraso = nº de concursos");
        assert_eq!(stats[0].frequency, 2);
    }

    #[test]
    fn test_matriz_posicional_soma_das_linhas() {
        let profile = Game::MegaSena.profile();
        let draws = vec![
            draw(1, vec![1, 2, 3, 4, 5, 6]),
            draw(2, vec![1, 2, 3, 7, 8, 9]),
            draw(3, vec![9, 8, 7, 3, 2, 1]),
        ];
        let matrix = position_matrix(&draws, &profile).unwrap();
        let counts = number_frequency(&draws, profile.max_number);

        for (idx, row) in matrix.iter().enumerate() {
            let soma: u32 = row.iter().sum();
            assert_eq!(
                soma, counts[idx],
                "soma da linha da dezena {} deve igualar sua frequência total",
                idx + 1
            );
        }
    }

    #[test]
    fn test_matriz_posicional_registra_a_posicao() {
        let profile = Game::MegaSena.profile();
        let draws = vec![draw(1, vec![10, 20, 30, 40, 50, 60])];
        let matrix = position_matrix(&draws, &profile).unwrap();
        assert_eq!(matrix[9][0], 1, "dezena 10 na posição 0");
        assert_eq!(matrix[59][5], 1, "dezena 60 na posição 5");
        assert_eq!(matrix[9][1], 0);
    }

    #[test]
    fn test_matriz_posicional_rejeita_comprimento_irregular() {
        let profile = Game::MegaSena.profile();
        let draws = vec![
            draw(1, vec![1, 2, 3, 4, 5, 6]),
            draw(2, vec![1, 2, 3]),
        ];
        assert!(position_matrix(&draws, &profile).is_err());
    }

    #[test]
    fn test_matriz_posicional_snapshot_vazio() {
        let profile = Game::Quina.profile();
        let matrix = position_matrix(&[], &profile).unwrap();
        assert_eq!(matrix.len(), 80);
        assert!(matrix.iter().all(|row| row.iter().all(|&c| c == 0)));
    }

    #[test]
    fn test_dezenas_recentes_respeitam_a_janela() {
        let draws = vec![
            draw(1, vec![1, 2]),
            draw(2, vec![3, 4]),
            draw(3, vec![5, 6]),
        ];
        let recent = recent_numbers(&draws, 2);
        // Janela 2 = concursos 3 e 2, independentemente da ordem do slice.
        assert!(recent.contains(&5) && recent.contains(&3));
        assert!(!recent.contains(&1), "concurso 1 está fora da janela");
    }

    #[test]
    fn test_dezenas_recentes_com_historico_curto() {
        let draws = vec![draw(1, vec![1, 2])];
        let recent = recent_numbers(&draws, 10);
        assert_eq!(recent.len(), 2);
    }
}
