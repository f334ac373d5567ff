use std::fmt;

use serde::Serialize;

use crate::data::{STAT_KINDS, StatEffect, StatKind};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatRow {
    pub hp: f32,
    pub atk: f32,
    pub def: f32,
    pub agl: f32,
    pub ats: f32,
}

impl StatRow {
    pub fn get(&self, stat: StatKind) -> f32 {
        match stat {
            StatKind::Hp => self.hp,
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Agl => self.agl,
            StatKind::Ats => self.ats,
        }
    }

    fn slot(&mut self, stat: StatKind) -> &mut f32 {
        match stat {
            StatKind::Hp => &mut self.hp,
            StatKind::Atk => &mut self.atk,
            StatKind::Def => &mut self.def,
            StatKind::Agl => &mut self.agl,
            StatKind::Ats => &mut self.ats,
        }
    }

    pub fn add(&mut self, stat: StatKind, value: f32) {
        *self.slot(stat) += value;
    }

    pub fn set(&mut self, stat: StatKind, value: f32) {
        *self.slot(stat) = value;
    }

    pub fn is_zero(&self) -> bool {
        STAT_KINDS.iter().all(|stat| self.get(*stat) == 0.0)
    }
}

impl fmt::Display for StatRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = STAT_KINDS
            .iter()
            .map(|stat| format!("{} {}", stat.as_str(), self.get(*stat)))
            .collect();
        f.write_str(&parts.join(" · "))
    }
}

/// Base stats from every placed rune plus the connectivity bonus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct BoardStats {
    pub rune_stats: StatRow,
    pub bonus_stats: StatRow,
}

impl BoardStats {
    pub fn total(&self, stat: StatKind) -> f32 {
        self.rune_stats.get(stat) + self.bonus_stats.get(stat)
    }
}

/// Sums rune effects into base stats and awards each stat category with a
/// connected contributor a single bonus equal to `connected_count`.
///
/// `contributions` yields each placed rune's effect with whether the rune is
/// connected to the special cell.
pub fn aggregate<I>(contributions: I, connected_count: usize) -> BoardStats
where
    I: IntoIterator<Item = (StatEffect, bool)>,
{
    let mut stats = BoardStats::default();
    let mut awarded = [false; STAT_KINDS.len()];
    let bonus = connected_count as f32;

    for (effect, connected) in contributions {
        stats.rune_stats.add(effect.stat, effect.value);
        let idx = stat_index(effect.stat);
        if connected && !awarded[idx] {
            stats.bonus_stats.set(effect.stat, bonus);
            awarded[idx] = true;
        }
    }
    stats
}

fn stat_index(stat: StatKind) -> usize {
    match stat {
        StatKind::Hp => 0,
        StatKind::Atk => 1,
        StatKind::Def => 2,
        StatKind::Agl => 3,
        StatKind::Ats => 4,
    }
}
