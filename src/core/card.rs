//! Card instances and their per-kind behavior

use crate::core::{CardId, CardName, Color, DefinitionId, GameEntity, ManaCost, Player, PlayerId};
use crate::zones::Zone;
use crate::Rejection;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Printed card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Land,
    Planeswalker,
}

/// The catalog's coarse classification, one per card kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Creature,
    Land,
    Spell,
    Enchantment,
    Artifact,
    Planeswalker,
}

impl BaseType {
    /// Type line a card of this base type is printed with
    pub fn card_type(&self) -> CardType {
        match self {
            BaseType::Creature => CardType::Creature,
            BaseType::Land => CardType::Land,
            BaseType::Spell => CardType::Instant,
            BaseType::Enchantment => CardType::Enchantment,
            BaseType::Artifact => CardType::Artifact,
            BaseType::Planeswalker => CardType::Planeswalker,
        }
    }

    pub fn parse(s: &str) -> Option<BaseType> {
        match s {
            "Creature" => Some(BaseType::Creature),
            "Land" => Some(BaseType::Land),
            "Spell" => Some(BaseType::Spell),
            "Enchantment" => Some(BaseType::Enchantment),
            "Artifact" => Some(BaseType::Artifact),
            "Planeswalker" => Some(BaseType::Planeswalker),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TapState {
    #[default]
    Untapped,
    Tapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyAbilityKind {
    Plus,
    Minus,
    Ultimate,
}

/// Loyalty cost: a fixed amount or the symbolic X
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLoyaltyCost", into = "RawLoyaltyCost")]
pub enum LoyaltyCost {
    Fixed(u32),
    X,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawLoyaltyCost {
    Number(i64),
    Symbol(String),
}

impl TryFrom<RawLoyaltyCost> for LoyaltyCost {
    type Error = String;

    fn try_from(raw: RawLoyaltyCost) -> Result<Self, Self::Error> {
        match raw {
            // Catalogs write minus costs both as 3 and as -3
            RawLoyaltyCost::Number(n) => u32::try_from(n.unsigned_abs())
                .map(LoyaltyCost::Fixed)
                .map_err(|_| format!("loyalty cost out of range: {n}")),
            RawLoyaltyCost::Symbol(s) if s.eq_ignore_ascii_case("x") => Ok(LoyaltyCost::X),
            RawLoyaltyCost::Symbol(s) => Err(format!("unknown loyalty cost '{s}'")),
        }
    }
}

impl From<LoyaltyCost> for RawLoyaltyCost {
    fn from(cost: LoyaltyCost) -> Self {
        match cost {
            LoyaltyCost::Fixed(n) => RawLoyaltyCost::Number(n as i64),
            LoyaltyCost::X => RawLoyaltyCost::Symbol("X".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyAbility {
    pub cost: LoyaltyCost,
    #[serde(rename = "type")]
    pub kind: LoyaltyAbilityKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl fmt::Display for LoyaltyAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.kind {
            LoyaltyAbilityKind::Plus => '+',
            LoyaltyAbilityKind::Minus | LoyaltyAbilityKind::Ultimate => '-',
        };
        match self.cost {
            LoyaltyCost::Fixed(n) => write!(f, "[{sign}{n}] {}", self.name),
            LoyaltyCost::X => write!(f, "[{sign}X] {}", self.name),
        }
    }
}

/// What a Spell does when it resolves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpellEffect {
    /// Damage to the targeted player or creature, the opponent when untargeted
    DealDamage { amount: i32 },
    /// Controller draws cards
    DrawCards { count: u8 },
    /// Controller gains life
    GainLife { amount: i32 },
}

/// Kind-specific state of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Creature {
        power: i32,
        toughness: i32,
        current_toughness: i32,
        summoning_sick: bool,
    },
    Land {
        produces: Color,
    },
    Spell {
        effect: Option<SpellEffect>,
    },
    Enchantment,
    Artifact,
    Planeswalker {
        initial_loyalty: i32,
        loyalty: i32,
        abilities: Vec<LoyaltyAbility>,
    },
}

impl CardKind {
    pub fn creature(power: i32, toughness: i32) -> Self {
        CardKind::Creature {
            power,
            toughness,
            current_toughness: toughness,
            summoning_sick: false,
        }
    }

    pub fn planeswalker(initial_loyalty: i32, abilities: Vec<LoyaltyAbility>) -> Self {
        CardKind::Planeswalker {
            initial_loyalty,
            loyalty: initial_loyalty,
            abilities,
        }
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            CardKind::Creature { .. } => BaseType::Creature,
            CardKind::Land { .. } => BaseType::Land,
            CardKind::Spell { .. } => BaseType::Spell,
            CardKind::Enchantment => BaseType::Enchantment,
            CardKind::Artifact => BaseType::Artifact,
            CardKind::Planeswalker { .. } => BaseType::Planeswalker,
        }
    }
}

/// Where a card goes once it leaves the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Onto its controller's battlefield
    Permanent,
    /// Effect applies, then the card goes to the graveyard
    Spell(Option<SpellEffect>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Survived,
    Destroyed,
    /// Not a creature
    Unaffected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoyaltyOutcome {
    Remaining(i32),
    Destroyed,
}

/// A card instance in a game
///
/// Many instances can share one catalog definition. The `zone` field mirrors
/// which collection holds the card; only `GameState::move_card` changes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub definition_id: DefinitionId,
    pub name: CardName,
    pub mana_cost: ManaCost,
    pub types: SmallVec<[CardType; 2]>,
    pub text: String,
    /// Fixed for the lifetime of the instance
    pub owner: PlayerId,
    pub zone: Zone,
    pub state: TapState,
    pub kind: CardKind,
}

impl Card {
    pub fn new(
        id: CardId,
        definition_id: impl Into<DefinitionId>,
        name: impl Into<CardName>,
        owner: PlayerId,
        kind: CardKind,
    ) -> Self {
        let mut types = SmallVec::new();
        types.push(kind.base_type().card_type());
        Card {
            id,
            definition_id: definition_id.into(),
            name: name.into(),
            mana_cost: ManaCost::new(),
            types,
            text: String::new(),
            owner,
            zone: Zone::Library,
            state: TapState::Untapped,
            kind,
        }
    }

    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = cost;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn base_type(&self) -> BaseType {
        self.kind.base_type()
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    pub fn is_creature(&self) -> bool {
        matches!(self.kind, CardKind::Creature { .. })
    }

    pub fn is_land(&self) -> bool {
        matches!(self.kind, CardKind::Land { .. })
    }

    pub fn is_planeswalker(&self) -> bool {
        matches!(self.kind, CardKind::Planeswalker { .. })
    }

    pub fn is_tapped(&self) -> bool {
        self.state == TapState::Tapped
    }

    /// Update the zone field; returns false when already there
    pub(crate) fn move_to(&mut self, zone: Zone) -> bool {
        if self.zone == zone {
            return false;
        }
        self.zone = zone;
        true
    }

    /// Tap a permanent. No-op (false) off the battlefield or if already tapped.
    pub fn tap(&mut self) -> bool {
        if self.zone != Zone::Battlefield || self.is_tapped() {
            return false;
        }
        self.state = TapState::Tapped;
        true
    }

    /// Untap a permanent. No-op (false) off the battlefield or if already untapped.
    pub fn untap(&mut self) -> bool {
        if self.zone != Zone::Battlefield || !self.is_tapped() {
            return false;
        }
        self.state = TapState::Untapped;
        true
    }

    /// Zone eligibility for casting. Mana is the caller's concern.
    pub fn can_be_played(&self, player: &Player) -> bool {
        self.owner == player.id && self.zone == Zone::Hand && player.zones.hand.contains(self.id)
    }

    /// Apply the kind-specific part of resolving this card
    ///
    /// Permanents arrive untapped; creatures arrive summoning sick at full
    /// toughness and planeswalkers at their starting loyalty. The caller moves
    /// the card according to the returned `Resolution`.
    pub fn resolve(&mut self) -> Resolution {
        self.state = TapState::Untapped;
        match &mut self.kind {
            CardKind::Creature {
                toughness,
                current_toughness,
                summoning_sick,
                ..
            } => {
                *current_toughness = *toughness;
                *summoning_sick = true;
                Resolution::Permanent
            }
            CardKind::Planeswalker {
                initial_loyalty,
                loyalty,
                ..
            } => {
                *loyalty = *initial_loyalty;
                Resolution::Permanent
            }
            CardKind::Land { .. } | CardKind::Enchantment | CardKind::Artifact => {
                Resolution::Permanent
            }
            CardKind::Spell { effect } => Resolution::Spell(effect.clone()),
        }
    }

    pub fn power(&self) -> Option<i32> {
        match self.kind {
            CardKind::Creature { power, .. } => Some(power),
            _ => None,
        }
    }

    pub fn toughness(&self) -> Option<i32> {
        match self.kind {
            CardKind::Creature { toughness, .. } => Some(toughness),
            _ => None,
        }
    }

    pub fn current_toughness(&self) -> Option<i32> {
        match self.kind {
            CardKind::Creature {
                current_toughness, ..
            } => Some(current_toughness),
            _ => None,
        }
    }

    pub fn has_summoning_sickness(&self) -> bool {
        matches!(
            self.kind,
            CardKind::Creature {
                summoning_sick: true,
                ..
            }
        )
    }

    pub fn loyalty(&self) -> Option<i32> {
        match self.kind {
            CardKind::Planeswalker { loyalty, .. } => Some(loyalty),
            _ => None,
        }
    }

    pub fn produces_mana(&self) -> Option<Color> {
        match self.kind {
            CardKind::Land { produces } => Some(produces),
            _ => None,
        }
    }

    pub fn loyalty_abilities(&self) -> &[LoyaltyAbility] {
        match &self.kind {
            CardKind::Planeswalker { abilities, .. } => abilities,
            _ => &[],
        }
    }

    /// On the battlefield, untapped and not summoning sick
    pub fn can_attack(&self) -> bool {
        self.zone == Zone::Battlefield
            && !self.is_tapped()
            && self.is_creature()
            && !self.has_summoning_sickness()
    }

    pub fn remove_summoning_sickness(&mut self) {
        if let CardKind::Creature { summoning_sick, .. } = &mut self.kind {
            *summoning_sick = false;
        }
    }

    pub fn remove_all_damage(&mut self) {
        if let CardKind::Creature {
            toughness,
            current_toughness,
            ..
        } = &mut self.kind
        {
            *current_toughness = *toughness;
        }
    }

    /// Mark damage on a creature
    ///
    /// Lethal damage resets toughness so the card is whole if it comes back;
    /// moving it to the graveyard is up to the caller.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        match &mut self.kind {
            CardKind::Creature {
                toughness,
                current_toughness,
                ..
            } => {
                *current_toughness = current_toughness.saturating_sub(amount.max(0));
                if *current_toughness <= 0 {
                    *current_toughness = *toughness;
                    DamageOutcome::Destroyed
                } else {
                    DamageOutcome::Survived
                }
            }
            _ => DamageOutcome::Unaffected,
        }
    }

    /// Add or remove loyalty
    ///
    /// Removing requires at least that much loyalty. Reaching zero or less
    /// means the planeswalker dies.
    pub fn modify_loyalty(&mut self, amount: i32) -> Result<LoyaltyOutcome, Rejection> {
        let CardKind::Planeswalker { loyalty, .. } = &mut self.kind else {
            return Err(Rejection::NotAPlaneswalker);
        };
        let updated = loyalty.saturating_add(amount);
        if amount < 0 && updated < 0 {
            return Err(Rejection::InsufficientLoyalty);
        }
        *loyalty = updated;
        if *loyalty <= 0 {
            Ok(LoyaltyOutcome::Destroyed)
        } else {
            Ok(LoyaltyOutcome::Remaining(*loyalty))
        }
    }

    /// Pay the loyalty cost of ability `index`
    pub fn activate_loyalty_ability(
        &mut self,
        index: usize,
    ) -> Result<(LoyaltyAbility, LoyaltyOutcome), Rejection> {
        if !self.is_planeswalker() {
            return Err(Rejection::NotAPlaneswalker);
        }
        let ability = self
            .loyalty_abilities()
            .get(index)
            .cloned()
            .ok_or(Rejection::NoSuchAbility)?;
        let LoyaltyCost::Fixed(cost) = ability.cost else {
            return Err(Rejection::VariableLoyaltyCost);
        };
        let cost = i32::try_from(cost).map_err(|_| Rejection::InsufficientLoyalty)?;
        let change = match ability.kind {
            LoyaltyAbilityKind::Plus => cost,
            LoyaltyAbilityKind::Minus | LoyaltyAbilityKind::Ultimate => -cost,
        };
        let outcome = self.modify_loyalty(change)?;
        Ok((ability, outcome))
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
