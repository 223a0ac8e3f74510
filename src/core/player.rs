//! Player representation

use crate::core::{Color, GameEntity, ManaCost, ManaPool, PlayerId, PlayerName};
use crate::zones::PlayerZones;
use serde::{Deserialize, Serialize};

/// A participant: life, mana and the zones they own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub life: i32,
    pub mana_pool: ManaPool,
    pub zones: PlayerZones,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, starting_life: i32) -> Self {
        Player {
            id,
            name: name.into(),
            life: starting_life,
            mana_pool: ManaPool::new(),
            zones: PlayerZones::new(id),
        }
    }

    pub fn gain_life(&mut self, amount: i32) {
        self.life = self.life.saturating_add(amount);
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.life = self.life.saturating_sub(amount);
    }

    pub fn has_lost(&self) -> bool {
        self.life <= 0
    }

    pub fn add_mana(&mut self, color: Color, amount: u8) {
        self.mana_pool.add_mana(color, amount);
    }

    pub fn pay_mana_cost(&mut self, cost: &ManaCost) -> bool {
        self.mana_pool.pay_mana_cost(cost)
    }

    pub fn empty_mana_pool(&mut self) {
        self.mana_pool.clear();
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let id = PlayerId::new(0);
        let player = Player::new(id, "Alice", 20);

        assert_eq!(player.id, id);
        assert_eq!(player.name.as_str(), "Alice");
        assert_eq!(player.life, 20);
        assert!(player.zones.hand.is_empty());
        assert!(!player.has_lost());
    }

    #[test]
    fn test_player_life() {
        let mut player = Player::new(PlayerId::new(1), "Bob", 20);

        player.take_damage(5);
        assert_eq!(player.life, 15);
        player.take_damage(15);
        assert!(player.has_lost());

        player.gain_life(3);
        assert_eq!(player.life, 3);
        assert!(!player.has_lost());
    }

    #[test]
    fn test_player_mana() {
        let mut player = Player::new(PlayerId::new(0), "Cleo", 20);
        player.add_mana(Color::Green, 2);
        assert!(player.pay_mana_cost(&ManaCost::from_string("1G")));
        assert_eq!(player.mana_pool.total(), 0);
        assert!(!player.pay_mana_cost(&ManaCost::from_string("G")));
    }
}
