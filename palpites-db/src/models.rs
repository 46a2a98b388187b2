use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Meses válidos para o campo "mês da sorte" do Dia de Sorte, na grafia da API.
pub const MONTHS: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("perfil sem dezenas sorteadas")]
    EmptyTicket,
    #[error("aposta de {ticket} dezenas não cabe no intervalo 1-{max}")]
    TicketLargerThanPool { ticket: usize, max: u8 },
    #[error("conjunto secundário de {count} números não cabe no intervalo 1-{max}")]
    SecondaryLargerThanPool { count: usize, max: u8 },
}

/// Um resultado histórico, na ordem em que a API devolve as dezenas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draw {
    pub draw_number: u32,
    pub draw_date: Option<NaiveDate>,
    pub numbers: Vec<u8>,
    #[serde(default)]
    pub secondary: Vec<u8>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub accumulated: bool,
    #[serde(default)]
    pub winner_count: u32,
    #[serde(default)]
    pub winner_prize: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secondary {
    /// Segundo conjunto de números (trevos, 2º sorteio da Dupla Sena).
    Numbers { count: usize, max: u8 },
    /// Mês da sorte, domínio fixo 1-12.
    Months,
    /// Time do coração, domínio observado no histórico.
    Teams,
}

/// Perfil estático de um jogo. Única fonte das restrições de domínio:
/// nenhum outro módulo ramifica por jogo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameProfile {
    pub numbers_per_ticket: usize,
    pub max_number: u8,
    pub secondary: Option<Secondary>,
}

impl GameProfile {
    /// Consistência interna do perfil. Verificada uma única vez, na definição
    /// da tabela de jogos, nunca a cada requisição.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.numbers_per_ticket == 0 {
            return Err(ProfileError::EmptyTicket);
        }
        if self.numbers_per_ticket > self.max_number as usize {
            return Err(ProfileError::TicketLargerThanPool {
                ticket: self.numbers_per_ticket,
                max: self.max_number,
            });
        }
        if let Some(Secondary::Numbers { count, max }) = self.secondary {
            if count == 0 || count > max as usize {
                return Err(ProfileError::SecondaryLargerThanPool { count, max });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    MegaSena,
    Quina,
    Lotofacil,
    DuplaSena,
    Timemania,
    DiaDeSorte,
    MaisMilionaria,
}

impl Game {
    pub const ALL: [Game; 7] = [
        Game::MegaSena,
        Game::Quina,
        Game::Lotofacil,
        Game::DuplaSena,
        Game::Timemania,
        Game::DiaDeSorte,
        Game::MaisMilionaria,
    ];

    /// Identificador usado na URL da API e como chave do cache.
    pub fn slug(&self) -> &'static str {
        match self {
            Game::MegaSena => "megasena",
            Game::Quina => "quina",
            Game::Lotofacil => "lotofacil",
            Game::DuplaSena => "duplasena",
            Game::Timemania => "timemania",
            Game::DiaDeSorte => "diadesorte",
            Game::MaisMilionaria => "maismilionaria",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Game::MegaSena => "Mega-Sena",
            Game::Quina => "Quina",
            Game::Lotofacil => "Lotofácil",
            Game::DuplaSena => "Dupla Sena",
            Game::Timemania => "Timemania",
            Game::DiaDeSorte => "Dia de Sorte",
            Game::MaisMilionaria => "+Milionária",
        }
    }

    pub fn profile(&self) -> GameProfile {
        match self {
            Game::MegaSena => GameProfile {
                numbers_per_ticket: 6,
                max_number: 60,
                secondary: None,
            },
            Game::Quina => GameProfile {
                numbers_per_ticket: 5,
                max_number: 80,
                secondary: None,
            },
            Game::Lotofacil => GameProfile {
                numbers_per_ticket: 15,
                max_number: 25,
                secondary: None,
            },
            Game::DuplaSena => GameProfile {
                numbers_per_ticket: 6,
                max_number: 50,
                secondary: Some(Secondary::Numbers { count: 6, max: 50 }),
            },
            Game::Timemania => GameProfile {
                numbers_per_ticket: 7,
                max_number: 80,
                secondary: Some(Secondary::Teams),
            },
            Game::DiaDeSorte => GameProfile {
                numbers_per_ticket: 7,
                max_number: 31,
                secondary: Some(Secondary::Months),
            },
            Game::MaisMilionaria => GameProfile {
                numbers_per_ticket: 6,
                max_number: 50,
                secondary: Some(Secondary::Numbers { count: 2, max: 6 }),
            },
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl std::str::FromStr for Game {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Game::ALL
            .iter()
            .find(|g| g.slug() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| {
                let slugs: Vec<&str> = Game::ALL.iter().map(|g| g.slug()).collect();
                format!("jogo desconhecido '{}' (válidos: {})", s, slugs.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todos_os_perfis_validos() {
        for game in Game::ALL {
            assert!(
                game.profile().validate().is_ok(),
                "perfil de {} deveria ser válido",
                game.name()
            );
        }
    }

    #[test]
    fn test_perfil_sem_dezenas_rejeitado() {
        let profile = GameProfile {
            numbers_per_ticket: 0,
            max_number: 60,
            secondary: None,
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_aposta_maior_que_intervalo_rejeitada() {
        // Amostragem sem reposição impossível: 10 dezenas distintas em 1-5.
        let profile = GameProfile {
            numbers_per_ticket: 10,
            max_number: 5,
            secondary: None,
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_secundario_maior_que_intervalo_rejeitado() {
        let profile = GameProfile {
            numbers_per_ticket: 6,
            max_number: 50,
            secondary: Some(Secondary::Numbers { count: 8, max: 6 }),
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_slug_ida_e_volta() {
        for game in Game::ALL {
            let parsed: Game = game.slug().parse().unwrap();
            assert_eq!(parsed, game);
        }
    }

    #[test]
    fn test_jogo_desconhecido() {
        assert!("federal".parse::<Game>().is_err());
        assert!("".parse::<Game>().is_err());
    }

    #[test]
    fn test_slug_aceita_maiusculas() {
        let parsed: Game = "MegaSena".parse().unwrap();
        assert_eq!(parsed, Game::MegaSena);
    }
}
