//! Response aggregators: how a pending command collects its answer.
//!
//! Most commands are answered by a single `resp` line. Listing commands are
//! answered by a stream of records tagged with the command's id, followed by
//! the `resp` line. The aggregator sits on the pending command, collects
//! the records as they arrive, and turns them into a [`Records`] payload
//! when the command resolves.
//!
//! `dump_all` is the odd one: the server multiplexes four record kinds
//! under one id, so its aggregator keeps four sequences side by side.

use spellwire_protocol::{
    Command, CounterSummary, ListRecord, PlayerSummary, ResponseOutcome,
    ZoneCard, ZoneSummary,
};

// ---------------------------------------------------------------------------
// GameDump
// ---------------------------------------------------------------------------

/// Everything `dump_all` streams back, demultiplexed by record kind.
///
/// Each sequence keeps the order its records arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameDump {
    pub players: Vec<PlayerSummary>,
    pub zones: Vec<ZoneSummary>,
    pub cards: Vec<ZoneCard>,
    pub counters: Vec<CounterSummary>,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The payload of a completed command.
///
/// Always [`Records::None`] unless the command was a listing command that
/// resolved `Ok`; on any other outcome the collected records are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Records {
    #[default]
    None,
    Players(Vec<PlayerSummary>),
    Zones(Vec<ZoneSummary>),
    Cards(Vec<ZoneCard>),
    Counters(Vec<CounterSummary>),
    All(GameDump),
}

// ---------------------------------------------------------------------------
// ResponseAggregator
// ---------------------------------------------------------------------------

/// Per-command record collector.
///
/// A closed set of variants: adding a record kind makes every `match` here
/// fail to compile until it is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAggregator {
    /// No records expected.
    Simple,
    ListPlayers(Vec<PlayerSummary>),
    ListZones(Vec<ZoneSummary>),
    DumpZone(Vec<ZoneCard>),
    ListCounters(Vec<CounterSummary>),
    DumpAll(GameDump),
}

impl ResponseAggregator {
    /// The aggregator a command needs.
    pub fn for_command(command: &Command) -> Self {
        match command {
            Command::ListPlayers => Self::ListPlayers(Vec::new()),
            Command::ListZones { .. } => Self::ListZones(Vec::new()),
            Command::DumpZone { .. } => Self::DumpZone(Vec::new()),
            Command::ListCounters { .. } => Self::ListCounters(Vec::new()),
            Command::DumpAll => Self::DumpAll(GameDump::default()),
            _ => Self::Simple,
        }
    }

    /// Appends a record addressed to this command.
    ///
    /// # Errors
    /// Hands the record back if this aggregator doesn't collect its kind.
    pub fn deliver(&mut self, record: ListRecord) -> Result<(), ListRecord> {
        match (self, record) {
            (Self::ListPlayers(players), ListRecord::Player(p)) => {
                players.push(p);
            }
            (Self::ListZones(zones), ListRecord::Zone(z)) => zones.push(z),
            (Self::DumpZone(cards), ListRecord::Card(c)) => cards.push(c),
            (Self::ListCounters(counters), ListRecord::Counter(c)) => {
                counters.push(c);
            }
            (Self::DumpAll(dump), record) => match record {
                ListRecord::Player(p) => dump.players.push(p),
                ListRecord::Zone(z) => dump.zones.push(z),
                ListRecord::Card(c) => dump.cards.push(c),
                ListRecord::Counter(c) => dump.counters.push(c),
            },
            (_, record) => return Err(record),
        }
        Ok(())
    }

    /// Consumes the aggregator. The payload survives only on `Ok`.
    pub fn resolve(self, outcome: ResponseOutcome) -> Records {
        if !outcome.is_ok() {
            return Records::None;
        }
        match self {
            Self::Simple => Records::None,
            Self::ListPlayers(players) => Records::Players(players),
            Self::ListZones(zones) => Records::Zones(zones),
            Self::DumpZone(cards) => Records::Cards(cards),
            Self::ListCounters(counters) => Records::Counters(counters),
            Self::DumpAll(dump) => Records::All(dump),
        }
    }

    /// Number of records collected so far.
    pub fn len(&self) -> usize {
        match self {
            Self::Simple => 0,
            Self::ListPlayers(v) => v.len(),
            Self::ListZones(v) => v.len(),
            Self::DumpZone(v) => v.len(),
            Self::ListCounters(v) => v.len(),
            Self::DumpAll(d) => {
                d.players.len() + d.zones.len() + d.cards.len() + d.counters.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
