//! The shared room record.
//!
//! Two online peers share nothing but this record, stored under a short
//! numeric code. The wire shape is camelCase JSON:
//!
//! ```text
//! { code, host, hostNickname, hostDeck, guest, guestNickname, guestDeck,
//!   status, isHostTurn, round, lastActionTime?, lastPlayerCard,
//!   lastBotCard, createdAt }
//! ```
//!
//! Decks hold card names until the first activation is published, then
//! per-card snapshots. `lastPlayerCard` is the host's last card and
//! `lastBotCard` the guest's.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Lobby status of a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Host waiting for a guest.
    Waiting,
    /// Guest joined, battle not started.
    Ready,
    Playing,
}

impl RoomStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Ready => "ready",
            RoomStatus::Playing => "playing",
        }
    }
}

/// Per-card state published after an activation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub is_dead: bool,
    pub damage: i32,
    pub defense: i32,
    pub speed: i32,
    pub ability_cooldown: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub frozen: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub feared: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub invisible_rounds: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub shield_rounds: u32,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub temp_defense: i32,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn is_zero_i32(value: &i32) -> bool {
    *value == 0
}

/// A deck as stored in the room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomDeck {
    /// Bootstrap: card names only.
    Names(Vec<String>),
    /// After the first activation.
    Snapshots(Vec<CardSnapshot>),
}

impl RoomDeck {
    /// Card names in deck order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        match self {
            RoomDeck::Names(names) => names.clone(),
            RoomDeck::Snapshots(cards) => cards.iter().map(|c| c.name.clone()).collect(),
        }
    }

    #[must_use]
    pub fn snapshots(&self) -> Option<&[CardSnapshot]> {
        match self {
            RoomDeck::Names(_) => None,
            RoomDeck::Snapshots(cards) => Some(cards),
        }
    }
}

/// Battle fields written by the turn holder after its activation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub host_deck: Vec<CardSnapshot>,
    pub guest_deck: Vec<CardSnapshot>,
    pub is_host_turn: bool,
    pub round: u32,
    pub last_action_time: u64,
    pub last_player_card: Option<String>,
    pub last_bot_card: Option<String>,
}

/// A write to the room record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomUpdate {
    /// Guest joins a waiting room.
    Join {
        guest: String,
        guest_nickname: String,
        guest_deck: Vec<String>,
    },
    /// Host starts the battle: bootstrap record, host moves first.
    Start,
    /// Activation published by the turn holder.
    Turn(TurnRecord),
}

/// The shared room record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: String,
    pub host: String,
    pub host_nickname: String,
    pub host_deck: RoomDeck,
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub guest_nickname: Option<String>,
    #[serde(default)]
    pub guest_deck: Option<RoomDeck>,
    pub status: RoomStatus,
    pub is_host_turn: bool,
    pub round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action_time: Option<u64>,
    #[serde(default)]
    pub last_player_card: Option<String>,
    #[serde(default)]
    pub last_bot_card: Option<String>,
    pub created_at: u64,
}

impl Room {
    /// A fresh room waiting for a guest.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        host: impl Into<String>,
        host_nickname: impl Into<String>,
        host_deck: Vec<String>,
        created_at: u64,
    ) -> Self {
        Self {
            code: code.into(),
            host: host.into(),
            host_nickname: host_nickname.into(),
            host_deck: RoomDeck::Names(host_deck),
            guest: None,
            guest_nickname: None,
            guest_deck: None,
            status: RoomStatus::Waiting,
            is_host_turn: true,
            round: 1,
            last_action_time: None,
            last_player_card: None,
            last_bot_card: None,
            created_at,
        }
    }

    /// Whether this record carries published stats (not the bootstrap).
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        self.last_action_time.is_some()
    }

    /// Apply a write, checking the lobby status it requires.
    pub fn apply(&mut self, update: RoomUpdate) -> Result<(), SyncError> {
        match update {
            RoomUpdate::Join {
                guest,
                guest_nickname,
                guest_deck,
            } => {
                if self.guest.is_some() {
                    return Err(SyncError::RoomFull(self.code.clone()));
                }
                self.expect_status(RoomStatus::Waiting)?;
                self.guest = Some(guest);
                self.guest_nickname = Some(guest_nickname);
                self.guest_deck = Some(RoomDeck::Names(guest_deck));
                self.status = RoomStatus::Ready;
            }
            RoomUpdate::Start => {
                self.expect_status(RoomStatus::Ready)?;
                self.status = RoomStatus::Playing;
                self.is_host_turn = true;
                self.round = 1;
                self.last_action_time = None;
                self.last_player_card = None;
                self.last_bot_card = None;
            }
            RoomUpdate::Turn(record) => {
                self.expect_status(RoomStatus::Playing)?;
                self.host_deck = RoomDeck::Snapshots(record.host_deck);
                self.guest_deck = Some(RoomDeck::Snapshots(record.guest_deck));
                self.is_host_turn = record.is_host_turn;
                self.round = record.round;
                self.last_action_time = Some(record.last_action_time);
                self.last_player_card = record.last_player_card;
                self.last_bot_card = record.last_bot_card;
            }
        }
        Ok(())
    }

    fn expect_status(&self, expected: RoomStatus) -> Result<(), SyncError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(SyncError::WrongStatus {
                code: self.code.clone(),
                status: self.status.as_str(),
                expected: expected.as_str(),
            })
        }
    }

    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: [&str; 3]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn snapshot(name: &str, health: i32) -> CardSnapshot {
        CardSnapshot {
            name: name.into(),
            health,
            max_health: 100,
            is_dead: health == 0,
            damage: 20,
            defense: 10,
            speed: 12,
            ability_cooldown: 0,
            frozen: false,
            feared: false,
            invisible_rounds: 0,
            shield_rounds: 0,
            temp_defense: 0,
        }
    }

    #[test]
    fn test_bootstrap_json_shape() {
        let room = Room::new("482913", "uid-1", "Ann", names(["Knight", "Archer", "Cleric"]), 1000);
        let json: serde_json::Value = serde_json::from_str(&room.to_json().unwrap()).unwrap();

        assert_eq!(json["code"], "482913");
        assert_eq!(json["hostNickname"], "Ann");
        assert_eq!(json["hostDeck"][0], "Knight");
        assert_eq!(json["status"], "waiting");
        assert_eq!(json["isHostTurn"], true);
        assert!(json.get("lastActionTime").is_none());
        assert!(!room.is_authoritative());
    }

    #[test]
    fn test_parse_snapshot_deck() {
        let json = r#"{
            "code": "100200",
            "host": "a", "hostNickname": "A",
            "hostDeck": [{"name": "Knight", "health": 50, "maxHealth": 130, "isDead": false,
                          "damage": 30, "defense": 20, "speed": 12, "abilityCooldown": 0}],
            "guest": "b", "guestNickname": "B",
            "guestDeck": ["Archer", "Squire", "Footman"],
            "status": "playing", "isHostTurn": false, "round": 2,
            "lastActionTime": 12345, "lastPlayerCard": "Knight", "lastBotCard": null,
            "createdAt": 1
        }"#;
        let room = Room::from_json(json).unwrap();

        let host = room.host_deck.snapshots().unwrap();
        assert_eq!(host[0].health, 50);
        assert!(!host[0].frozen);
        assert_eq!(host[0].invisible_rounds, 0);
        assert_eq!(room.guest_deck.unwrap().names(), names(["Archer", "Squire", "Footman"]));
        assert!(room.last_action_time.is_some());
    }

    #[test]
    fn test_lobby_transitions() {
        let mut room = Room::new("1", "a", "A", names(["Knight", "Archer", "Cleric"]), 0);

        let start_early = room.apply(RoomUpdate::Start).unwrap_err();
        assert!(matches!(start_early, SyncError::WrongStatus { expected: "ready", .. }));

        let join = RoomUpdate::Join {
            guest: "b".into(),
            guest_nickname: "B".into(),
            guest_deck: names(["Dragon", "Squire", "Ranger"]),
        };
        room.apply(join.clone()).unwrap();
        assert_eq!(room.status, RoomStatus::Ready);
        assert!(matches!(room.apply(join), Err(SyncError::RoomFull(_))));

        room.apply(RoomUpdate::Start).unwrap();
        assert_eq!(room.status, RoomStatus::Playing);
        assert!(room.is_host_turn);
    }

    #[test]
    fn test_turn_record_applies() {
        let mut room = Room::new("1", "a", "A", names(["Knight", "Archer", "Cleric"]), 0);
        room.status = RoomStatus::Playing;

        room.apply(RoomUpdate::Turn(TurnRecord {
            host_deck: vec![snapshot("Knight", 80)],
            guest_deck: vec![snapshot("Dragon", 0)],
            is_host_turn: false,
            round: 1,
            last_action_time: 99,
            last_player_card: Some("Knight".into()),
            last_bot_card: None,
        }))
        .unwrap();

        assert!(room.is_authoritative());
        assert!(!room.is_host_turn);
        assert_eq!(room.guest_deck.as_ref().unwrap().snapshots().unwrap()[0].health, 0);
    }

    #[test]
    fn test_status_fields_omitted_when_default() {
        let json = serde_json::to_value(snapshot("Knight", 10)).unwrap();
        assert!(json.get("frozen").is_none());
        assert!(json.get("shieldRounds").is_none());
        assert_eq!(json["abilityCooldown"], 0);
    }
}
