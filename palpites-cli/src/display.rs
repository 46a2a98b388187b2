use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::analysis::generator::Suggestion;
use crate::analysis::NumberStats;
use palpites_db::models::{Draw, Game, Secondary};

const BAR_WIDTH: usize = 30;

/// Rótulo do conjunto secundário de cada jogo, quando existe.
pub fn secondary_label(game: Game) -> Option<&'static str> {
    match game {
        Game::DuplaSena => Some("2º Sorteio"),
        Game::Timemania => Some("Time do Coração"),
        Game::DiaDeSorte => Some("Mês da Sorte"),
        Game::MaisMilionaria => Some("Trevos"),
        _ => None,
    }
}

fn numbers_str(numbers: &[u8]) -> String {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_games() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Jogo", "Identificador", "Dezenas", "Intervalo", "Extra"]);

    for game in Game::ALL {
        let profile = game.profile();
        let extra = match profile.secondary {
            Some(Secondary::Numbers { count, max }) => {
                format!("{} de 1-{}", count, max)
            }
            Some(Secondary::Months) => "mês da sorte".to_string(),
            Some(Secondary::Teams) => "time do coração".to_string(),
            None => "—".to_string(),
        };
        table.add_row(vec![
            game.name().to_string(),
            game.slug().to_string(),
            profile.numbers_per_ticket.to_string(),
            format!("1-{}", profile.max_number),
            extra,
        ]);
    }
    println!("{table}");
}

pub fn display_draws(draws: &[Draw], game: Game) {
    if draws.is_empty() {
        println!("Nenhum concurso para exibir.");
        return;
    }

    let sec_label = secondary_label(game);
    let mut header = vec!["Concurso", "Data", "Dezenas"];
    if let Some(label) = sec_label {
        header.push(label);
    }
    header.push("Ganhadores");
    header.push("Prêmio");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for draw in draws {
        let date = draw
            .draw_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "—".to_string());

        let prize = if draw.winner_prize > 0.0 {
            format!("R$ {:.2}", draw.winner_prize)
        } else {
            "—".to_string()
        };

        let winners = if draw.accumulated {
            Cell::new("Acumulou").fg(Color::Red)
        } else {
            Cell::new(draw.winner_count.to_string()).fg(Color::Green)
        };

        let mut row = vec![
            Cell::new(draw.draw_number.to_string()),
            Cell::new(date),
            Cell::new(numbers_str(&draw.numbers)),
        ];
        if sec_label.is_some() {
            let extra = if !draw.secondary.is_empty() {
                numbers_str(&draw.secondary)
            } else {
                draw.category.clone().unwrap_or_else(|| "—".to_string())
            };
            row.push(Cell::new(extra));
        }
        row.push(winners);
        row.push(Cell::new(prize));
        table.add_row(row);
    }

    println!("{table}");
}

/// Tabela de frequência e atraso com barra proporcional, da dezena mais
/// sorteada para a menos sorteada.
pub fn display_stats(stats: &[NumberStats], window: usize, label: &str) {
    println!("\n📊 {} ({} concursos)\n", label, window);

    let max_freq = stats.iter().map(|s| s.frequency).max().unwrap_or(0);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Dezena", "Frequência", "Atraso", ""]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        let bar = if max_freq > 0 {
            "█".repeat((stat.frequency as usize * BAR_WIDTH) / max_freq as usize)
        } else {
            String::new()
        };
        table.add_row(vec![
            format!("{:02}", stat.number),
            stat.frequency.to_string(),
            stat.gap.to_string(),
            bar,
        ]);
    }
    println!("{table}");
}

/// Frequência simples (sem atraso), usada para o conjunto secundário.
pub fn display_counts(counts: &[u32], label: &str) {
    println!("\n── {} ──", label);

    let max_freq = counts.iter().copied().max().unwrap_or(0);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Número", "Frequência", ""]);

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));

    for idx in order {
        let bar = if max_freq > 0 {
            "█".repeat((counts[idx] as usize * BAR_WIDTH) / max_freq as usize)
        } else {
            String::new()
        };
        table.add_row(vec![
            format!("{:02}", idx + 1),
            counts[idx].to_string(),
            bar,
        ]);
    }
    println!("{table}");
}

pub fn display_categories(counts: &[(String, u32)], label: &str) {
    println!("\n── {} ──", label);

    if counts.is_empty() {
        println!("Sem ocorrências no histórico.");
        return;
    }

    let max_freq = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![label, "Frequência", ""]);

    for (cat, freq) in counts {
        let bar = if max_freq > 0 {
            "█".repeat((*freq as usize * BAR_WIDTH) / max_freq as usize)
        } else {
            String::new()
        };
        table.add_row(vec![cat.clone(), freq.to_string(), bar]);
    }
    println!("{table}");
}

/// Mapa de calor dezena × posição do sorteio. Verde = terço superior das
/// contagens, amarelo = terço médio, ponto = nunca saiu naquela posição.
pub fn display_heatmap(matrix: &[Vec<u32>], window: usize) {
    println!("\n📊 Mapa de calor por posição ({} concursos)\n", window);

    let max_cell = matrix.iter().flatten().copied().max().unwrap_or(0);
    if max_cell == 0 {
        println!("Sem dados para o mapa de calor.");
        return;
    }

    let positions = matrix.first().map(|row| row.len()).unwrap_or(0);
    let mut header = vec!["Dezena".to_string()];
    for p in 1..=positions {
        header.push(format!("P{}", p));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (idx, row) in matrix.iter().enumerate() {
        let mut cells = vec![Cell::new(format!("{:02}", idx + 1))];
        for &count in row {
            let cell = if count == 0 {
                Cell::new("·")
            } else if count * 3 >= max_cell * 2 {
                Cell::new(count.to_string()).fg(Color::Green)
            } else if count * 3 >= max_cell {
                Cell::new(count.to_string()).fg(Color::Yellow)
            } else {
                Cell::new(count.to_string())
            };
            cells.push(cell);
        }
        table.add_row(cells);
    }
    println!("{table}");
}

pub fn display_suggestions(suggestions: &[Suggestion], game: Game) {
    println!("\n🎲 Palpites para {}\n", game.name());

    let sec_label = secondary_label(game);
    let mut header = vec!["#", "Dezenas"];
    if let Some(label) = sec_label {
        header.push(label);
    }
    header.push("Estratégia");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (i, sug) in suggestions.iter().enumerate() {
        let mut row = vec![
            Cell::new(format!("{}", i + 1)),
            Cell::new(numbers_str(&sug.numbers)).fg(Color::Green),
        ];
        if sec_label.is_some() {
            let extra = if !sug.secondary.is_empty() {
                numbers_str(&sug.secondary)
            } else {
                sug.category.clone().unwrap_or_else(|| "—".to_string())
            };
            row.push(Cell::new(extra).fg(Color::Yellow));
        }
        row.push(Cell::new(sug.strategy.to_string()));
        table.add_row(row);
    }
    println!("{table}");
}
