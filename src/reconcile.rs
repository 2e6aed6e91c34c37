//! Shift status derivation and optimistic state reconciliation.
//!
//! A shift shown to a volunteer is backed by two sources: the last fields the
//! backend returned (`authoritative`) and a locally cached [`RosterEntry`]
//! written after a user action succeeded (`optimistic`). Everything here is
//! pure: callers pass the clock in, and list membership is always recomputed
//! from [`derive_status`].

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;

use crate::model::{DisplayStatus, RosterEntry, RosterStatus, Shift, ShiftState};

/// Overlay a cached roster entry onto backend fields. Backend values always
/// win; the cache only fills fields the backend left empty. A cached
/// `is_paid` may fill the gap only with `false`.
pub fn merge(authoritative: &Shift, optimistic: Option<&RosterEntry>) -> Shift {
    let mut view = authoritative.clone();
    let Some(entry) = optimistic else {
        return view;
    };

    if view.roster_status.is_none() {
        view.roster_status = Some(entry.roster_status);
    }
    if view.check_in_time.is_none() {
        view.check_in_time = entry.check_in_time.clone();
    }
    if view.check_out_time.is_none() {
        view.check_out_time = entry.check_out_time.clone();
    }
    if view.payout_amount.is_none() {
        view.payout_amount = entry.payout_amount;
    }
    if view.beneficiaries_served.is_none() {
        view.beneficiaries_served = entry.beneficiaries_served;
    }
    if view.is_paid.is_none() && entry.is_paid == Some(false) {
        view.is_paid = Some(false);
    }
    view
}

/// Derive the display status of `shift` given an optional cached entry.
/// Rules are priority ordered; the first match wins.
///
/// The implied-completion rule only looks at the checkout and payout the
/// backend reported, so cached fields can never make a shift look paid.
pub fn derive_status(shift: &Shift, cached: Option<&RosterEntry>) -> DisplayStatus {
    derive(shift, cached, true)
}

/// Like [`derive_status`], except the cached roster status no longer takes
/// precedence over backend fields. The entry only fills gaps.
pub fn derive_status_gap_fill(shift: &Shift, cached: Option<&RosterEntry>) -> DisplayStatus {
    derive(shift, cached, false)
}

fn derive(shift: &Shift, cached: Option<&RosterEntry>, cache_leads: bool) -> DisplayStatus {
    let view = merge(shift, cached);
    let backend_payout = shift.payout_amount.unwrap_or(0.0);

    if view.is_paid == Some(true) {
        return DisplayStatus::Completed;
    }
    if shift.check_out_time.is_some() && backend_payout > 0.0 && view.is_paid != Some(false) {
        return DisplayStatus::Completed;
    }
    if cache_leads {
        let cached_status = cached.map(|entry| entry.roster_status);
        if let Some(status) = cached_status.filter(|s| *s != RosterStatus::Completed) {
            return status.into();
        }
    }
    if view.check_out_time.is_some() && view.is_paid == Some(false) {
        return DisplayStatus::PendingPayment;
    }
    if view.check_in_time.is_some() && view.check_out_time.is_none() {
        return DisplayStatus::CheckedIn;
    }
    // Backend roster relationship with no timestamps yet.
    if view.roster_status == Some(RosterStatus::Registered) {
        return DisplayStatus::Registered;
    }
    DisplayStatus::Available
}

/// A shift paired with its optimistic override.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked {
    pub authoritative: Shift,
    pub optimistic: Option<RosterEntry>,
}

impl Tracked {
    pub fn new(authoritative: Shift, optimistic: Option<RosterEntry>) -> Self {
        Self {
            authoritative,
            optimistic,
        }
    }

    pub fn id(&self) -> i64 {
        self.authoritative.id
    }

    /// True once the backend alone derives a status at least as far along
    /// the lifecycle as the cached entry claims. Only then may the entry be
    /// dropped from the store.
    pub fn is_superseded(&self) -> bool {
        match &self.optimistic {
            Some(entry) => {
                let backend = derive_status(&self.authoritative, None);
                backend.rank() >= DisplayStatus::from(entry.roster_status).rank()
            }
            None => false,
        }
    }

    /// The cached entry unless the backend has caught up with it. It keeps
    /// filling gaps however old it is.
    pub fn unconfirmed(&self) -> Option<&RosterEntry> {
        if self.is_superseded() {
            return None;
        }
        self.optimistic.as_ref()
    }

    /// The unconfirmed entry while it is younger than `ttl`. Only a live
    /// entry's roster status outranks fields the backend does report.
    pub fn live_optimistic(&self, now: DateTime<Utc>, ttl: Duration) -> Option<&RosterEntry> {
        self.unconfirmed()
            .filter(|entry| now - entry.updated_at <= ttl)
    }

    pub fn view(&self) -> Shift {
        merge(&self.authoritative, self.unconfirmed())
    }

    pub fn status_at(&self, now: DateTime<Utc>, ttl: Duration) -> DisplayStatus {
        match self.live_optimistic(now, ttl) {
            Some(entry) => derive_status(&self.authoritative, Some(entry)),
            None => derive_status_gap_fill(&self.authoritative, self.unconfirmed()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Register,
    CheckIn,
    CheckOut,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Register => "Register",
            Action::CheckIn => "Check In",
            Action::CheckOut => "Check Out",
        }
    }
}

/// What the shift row offers the volunteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub action: Option<Action>,
    pub enabled: bool,
    pub badge: Option<&'static str>,
}

pub fn action_for(status: DisplayStatus, shift: &Shift) -> ActionButton {
    match status {
        DisplayStatus::Available => ActionButton {
            action: Some(Action::Register),
            enabled: shift.is_funded == Some(true),
            badge: None,
        },
        // Location is enforced by the backend.
        DisplayStatus::Registered => ActionButton {
            action: Some(Action::CheckIn),
            enabled: true,
            badge: None,
        },
        DisplayStatus::CheckedIn => ActionButton {
            action: Some(Action::CheckOut),
            enabled: true,
            badge: None,
        },
        DisplayStatus::PendingPayment => ActionButton {
            action: None,
            enabled: false,
            badge: Some("Pending payment"),
        },
        DisplayStatus::Completed => ActionButton {
            action: None,
            enabled: false,
            badge: Some("Paid"),
        },
    }
}

/// State change recorded locally after a successful action.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Register,
    CheckIn {
        check_in_time: String,
    },
    CheckOut {
        check_out_time: String,
        payout_amount: f64,
        beneficiaries_served: u32,
    },
}

impl Transition {
    pub fn apply(&self, previous: Option<&RosterEntry>, now: DateTime<Utc>) -> RosterEntry {
        let mut entry = previous
            .cloned()
            .unwrap_or_else(|| RosterEntry::new(RosterStatus::Registered, now));
        entry.updated_at = now;
        match self {
            Transition::Register => {
                entry.roster_status = RosterStatus::Registered;
            }
            Transition::CheckIn { check_in_time } => {
                entry.roster_status = RosterStatus::CheckedIn;
                entry.check_in_time = Some(check_in_time.clone());
            }
            Transition::CheckOut {
                check_out_time,
                payout_amount,
                beneficiaries_served,
            } => {
                entry.roster_status = RosterStatus::PendingPayment;
                entry.check_out_time = Some(check_out_time.clone());
                entry.payout_amount = Some(*payout_amount);
                entry.beneficiaries_served = Some(*beneficiaries_served);
                entry.is_paid = Some(false);
            }
        }
        entry
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Available,
    Upcoming,
    Pending,
    Completed,
    All,
}

impl Tab {
    fn admits(&self, status: DisplayStatus) -> bool {
        match self {
            Tab::Available => status == DisplayStatus::Available,
            Tab::Upcoming => matches!(
                status,
                DisplayStatus::Registered | DisplayStatus::CheckedIn
            ),
            Tab::Pending => status == DisplayStatus::PendingPayment,
            Tab::Completed => status == DisplayStatus::Completed,
            Tab::All => status != DisplayStatus::Available,
        }
    }
}

/// In-memory shift lists behind the volunteer screen: the sign-up list
/// (upcoming shifts with open spots) and the full list the "my shifts" tabs
/// are cut from. Both hold [`Tracked`] values for the same shift ids, so an
/// optimistic update is applied to each.
#[derive(Debug, Clone)]
pub struct ShiftBoard {
    available: Vec<Tracked>,
    mine: Vec<Tracked>,
    ttl: Duration,
}

impl ShiftBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            available: Vec::new(),
            mine: Vec::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace both lists from a fresh fetch. `cached` looks up the stored
    /// entry for a shift id.
    pub fn load<F>(&mut self, shifts: Vec<Shift>, mut cached: F)
    where
        F: FnMut(i64) -> Option<RosterEntry>,
    {
        self.mine = shifts
            .into_iter()
            .map(|shift| {
                let entry = cached(shift.id);
                Tracked::new(shift, entry)
            })
            .collect();
        self.available = self
            .mine
            .iter()
            .filter(|t| {
                t.authoritative.status == Some(ShiftState::Upcoming)
                    && t.authoritative.has_open_spots()
            })
            .cloned()
            .collect();
    }

    pub fn find(&self, shift_id: i64) -> Option<&Tracked> {
        self.mine
            .iter()
            .chain(self.available.iter())
            .find(|t| t.id() == shift_id)
    }

    /// Apply an optimistic entry to every list holding `shift_id`. Returns
    /// how many shift objects were updated.
    pub fn apply(&mut self, shift_id: i64, entry: &RosterEntry) -> usize {
        let mut touched = 0;
        for tracked in self
            .available
            .iter_mut()
            .chain(self.mine.iter_mut())
            .filter(|t| t.id() == shift_id)
        {
            tracked.optimistic = Some(entry.clone());
            touched += 1;
        }
        touched
    }

    pub fn bucket_at(&self, tab: Tab, now: DateTime<Utc>) -> Vec<&Tracked> {
        let source = match tab {
            Tab::Available => &self.available,
            _ => &self.mine,
        };
        source
            .iter()
            .filter(|t| tab.admits(t.status_at(now, self.ttl)))
            .collect()
    }

    pub fn bucket(&self, tab: Tab) -> Vec<&Tracked> {
        self.bucket_at(tab, Utc::now())
    }

    /// Ids whose optimistic entry the backend has caught up with. Expired
    /// entries are not listed; they still fill gaps.
    pub fn superseded_entries(&self) -> Vec<i64> {
        self.mine
            .iter()
            .filter(|t| t.is_superseded())
            .map(Tracked::id)
            .collect()
    }

    /// Whether `shift_id` is on the sign-up list (upcoming with spots left).
    pub fn is_open(&self, shift_id: i64) -> bool {
        self.available.iter().any(|t| t.id() == shift_id)
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> VolunteerStats {
        let views: Vec<Shift> = self
            .bucket_at(Tab::Completed, now)
            .into_iter()
            .map(Tracked::view)
            .collect();
        VolunteerStats::from_completed(&views)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VolunteerStats {
    pub total_earned: f64,
    pub total_hours: f64,
    pub total_beneficiaries: u64,
}

impl VolunteerStats {
    pub fn from_completed(shifts: &[Shift]) -> Self {
        let total_earned = shifts.iter().filter_map(|s| s.payout_amount).sum();
        let hours: f64 = shifts
            .iter()
            .filter_map(|s| scheduled_hours(s.start_time.as_deref()?, s.end_time.as_deref()?))
            .sum();
        let total_beneficiaries = shifts
            .iter()
            .filter_map(|s| s.beneficiaries_served)
            .map(u64::from)
            .sum();
        Self {
            total_earned,
            total_hours: (hours * 10.0).round() / 10.0,
            total_beneficiaries,
        }
    }
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

fn scheduled_hours(start: &str, end: &str) -> Option<f64> {
    let start = parse_clock(start)?;
    let end = parse_clock(end)?;
    Some((end - start).num_seconds() as f64 / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(id: i64) -> Shift {
        Shift {
            id,
            title: format!("Shift {id}"),
            is_funded: Some(true),
            status: Some(ShiftState::Upcoming),
            max_volunteers: Some(10),
            volunteers_signed_up: Some(0),
            ..Default::default()
        }
    }

    fn entry(status: RosterStatus) -> RosterEntry {
        RosterEntry::new(status, Utc::now())
    }

    fn day() -> Duration {
        Duration::hours(24)
    }

    #[test]
    fn no_relationship_is_available() {
        let s = Shift {
            is_paid: Some(false),
            ..shift(5)
        };
        let status = derive_status(&s, None);
        assert_eq!(status, DisplayStatus::Available);
        let button = action_for(status, &s);
        assert_eq!(button.action, Some(Action::Register));
        assert!(button.enabled);
    }

    #[test]
    fn paid_wins_over_any_cache() {
        let s = Shift {
            is_paid: Some(true),
            payout_amount: Some(450.0),
            ..shift(5)
        };
        for cached in [
            RosterStatus::Registered,
            RosterStatus::CheckedIn,
            RosterStatus::PendingPayment,
            RosterStatus::Completed,
        ] {
            assert_eq!(
                derive_status(&s, Some(&entry(cached))),
                DisplayStatus::Completed
            );
        }
        assert_eq!(derive_status(&s, None), DisplayStatus::Completed);
    }

    #[test]
    fn checkout_with_payout_and_no_paid_flag_is_completed() {
        let s = Shift {
            check_in_time: Some("T1".into()),
            check_out_time: Some("T2".into()),
            payout_amount: Some(300.0),
            ..shift(5)
        };
        assert_eq!(derive_status(&s, None), DisplayStatus::Completed);
    }

    #[test]
    fn checkout_unpaid_is_pending_payment() {
        let s = Shift {
            check_out_time: Some("T2".into()),
            payout_amount: Some(450.0),
            is_paid: Some(false),
            ..shift(5)
        };
        assert_eq!(derive_status(&s, None), DisplayStatus::PendingPayment);
        let button = action_for(DisplayStatus::PendingPayment, &s);
        assert_eq!(button.action, None);
        assert_eq!(button.badge, Some("Pending payment"));
    }

    #[test]
    fn checked_in_from_timestamps() {
        let s = Shift {
            check_in_time: Some("T1".into()),
            check_out_time: None,
            ..shift(5)
        };
        assert_eq!(derive_status(&s, None), DisplayStatus::CheckedIn);
    }

    #[test]
    fn cached_status_fills_gap() {
        let s = shift(5);
        assert_eq!(
            derive_status(&s, Some(&entry(RosterStatus::Registered))),
            DisplayStatus::Registered
        );
        assert_eq!(
            derive_status(&s, Some(&entry(RosterStatus::CheckedIn))),
            DisplayStatus::CheckedIn
        );
    }

    #[test]
    fn cached_completed_is_never_trusted() {
        let s = shift(5);
        assert_eq!(
            derive_status(&s, Some(&entry(RosterStatus::Completed))),
            DisplayStatus::Available
        );
    }

    #[test]
    fn cached_paid_flag_cannot_complete_a_shift() {
        let mut cached = entry(RosterStatus::PendingPayment);
        cached.check_out_time = Some("T2".into());
        cached.payout_amount = Some(450.0);
        cached.is_paid = Some(true);
        let view = merge(&shift(5), Some(&cached));
        assert_eq!(view.is_paid, None);
        assert_eq!(
            derive_status(&shift(5), Some(&cached)),
            DisplayStatus::PendingPayment
        );
    }

    #[test]
    fn cached_checkout_does_not_look_paid() {
        let cached = Transition::CheckOut {
            check_out_time: "T2".into(),
            payout_amount: 450.0,
            beneficiaries_served: 12,
        }
        .apply(Some(&entry(RosterStatus::CheckedIn)), Utc::now());
        assert_eq!(
            derive_status(&shift(5), Some(&cached)),
            DisplayStatus::PendingPayment
        );
    }

    #[test]
    fn backend_registered_without_cache() {
        let s = Shift {
            roster_status: Some(RosterStatus::Registered),
            ..shift(5)
        };
        assert_eq!(derive_status(&s, None), DisplayStatus::Registered);
    }

    #[test]
    fn merge_prefers_backend_fields() {
        let s = Shift {
            payout_amount: Some(500.0),
            check_in_time: Some("backend".into()),
            ..shift(5)
        };
        let mut cached = entry(RosterStatus::PendingPayment);
        cached.payout_amount = Some(450.0);
        cached.check_in_time = Some("cache".into());
        cached.beneficiaries_served = Some(7);
        let view = merge(&s, Some(&cached));
        assert_eq!(view.payout_amount, Some(500.0));
        assert_eq!(view.check_in_time.as_deref(), Some("backend"));
        assert_eq!(view.beneficiaries_served, Some(7));
    }

    #[test]
    fn backend_progress_supersedes_cache() {
        let s = Shift {
            check_in_time: Some("T1".into()),
            ..shift(5)
        };
        let now = Utc::now();
        for cached in [RosterStatus::Registered, RosterStatus::CheckedIn] {
            let tracked = Tracked::new(s.clone(), Some(entry(cached)));
            assert!(tracked.is_superseded());
            assert!(tracked.live_optimistic(now, day()).is_none());
            assert_eq!(tracked.status_at(now, day()), DisplayStatus::CheckedIn);
        }
    }

    #[test]
    fn lagging_backend_keeps_cache() {
        let now = Utc::now();
        let tracked = Tracked::new(shift(5), Some(entry(RosterStatus::CheckedIn)));
        assert!(tracked.live_optimistic(now, day()).is_some());
        assert_eq!(tracked.status_at(now, day()), DisplayStatus::CheckedIn);
    }

    #[test]
    fn expired_entry_still_fills_gaps() {
        let now = Utc::now();
        let mut cached = Transition::CheckOut {
            check_out_time: "T2".into(),
            payout_amount: 450.0,
            beneficiaries_served: 9,
        }
        .apply(None, now);
        cached.updated_at = now - Duration::hours(25);
        let tracked = Tracked::new(shift(5), Some(cached));

        assert!(tracked.live_optimistic(now, day()).is_none());
        assert!(!tracked.is_superseded());
        assert_eq!(tracked.status_at(now, day()), DisplayStatus::PendingPayment);
        assert_eq!(tracked.view().payout_amount, Some(450.0));

        let registered = RosterEntry::new(RosterStatus::Registered, now - Duration::days(7));
        let tracked = Tracked::new(shift(6), Some(registered));
        assert_eq!(tracked.status_at(now, day()), DisplayStatus::Registered);
    }

    #[test]
    fn expired_entry_no_longer_outranks_backend_fields() {
        let now = Utc::now();
        let backend = Shift {
            roster_status: Some(RosterStatus::Registered),
            ..shift(5)
        };
        let fresh = Tracked::new(backend.clone(), Some(entry(RosterStatus::CheckedIn)));
        assert_eq!(fresh.status_at(now, day()), DisplayStatus::CheckedIn);

        let old = RosterEntry::new(RosterStatus::CheckedIn, now - Duration::hours(30));
        let expired = Tracked::new(backend, Some(old));
        assert!(!expired.is_superseded());
        assert_eq!(expired.status_at(now, day()), DisplayStatus::Registered);
    }

    #[test]
    fn paid_backend_overrides_pending_cache() {
        let backend = Shift {
            is_paid: Some(true),
            payout_amount: Some(450.0),
            ..shift(5)
        };
        let cached = Transition::CheckOut {
            check_out_time: "T2".into(),
            payout_amount: 450.0,
            beneficiaries_served: 3,
        }
        .apply(None, Utc::now());
        let tracked = Tracked::new(backend, Some(cached));
        let now = Utc::now();
        assert_eq!(tracked.status_at(now, day()), DisplayStatus::Completed);
        assert_eq!(
            action_for(DisplayStatus::Completed, &tracked.authoritative).badge,
            Some("Paid")
        );
    }

    #[test]
    fn register_disabled_when_unfunded() {
        for funded in [None, Some(false)] {
            let s = Shift {
                is_funded: funded,
                check_in_time: None,
                ..shift(5)
            };
            let button = action_for(derive_status(&s, None), &s);
            assert_eq!(button.action, Some(Action::Register));
            assert!(!button.enabled);
        }
    }

    #[test]
    fn transitions_accumulate_fields() {
        let t0 = Utc::now();
        let registered = Transition::Register.apply(None, t0);
        assert_eq!(registered.roster_status, RosterStatus::Registered);
        let checked_in = Transition::CheckIn {
            check_in_time: "T1".into(),
        }
        .apply(Some(&registered), t0 + Duration::minutes(5));
        assert_eq!(checked_in.roster_status, RosterStatus::CheckedIn);
        assert_eq!(checked_in.updated_at, t0 + Duration::minutes(5));
        let out = Transition::CheckOut {
            check_out_time: "T2".into(),
            payout_amount: 450.0,
            beneficiaries_served: 20,
        }
        .apply(Some(&checked_in), t0 + Duration::hours(4));
        assert_eq!(out.roster_status, RosterStatus::PendingPayment);
        assert_eq!(out.check_in_time.as_deref(), Some("T1"));
        assert_eq!(out.payout_amount, Some(450.0));
        assert_eq!(out.is_paid, Some(false));
    }

    #[test]
    fn board_moves_shift_between_buckets_on_apply() {
        let mut board = ShiftBoard::new(day());
        board.load(vec![shift(5), shift(6)], |_| None);
        let now = Utc::now();
        assert_eq!(board.bucket_at(Tab::Available, now).len(), 2);
        assert!(board.bucket_at(Tab::Upcoming, now).is_empty());

        let registered = Transition::Register.apply(None, now);
        assert_eq!(board.apply(5, &registered), 2);

        let available: Vec<i64> = board
            .bucket_at(Tab::Available, now)
            .into_iter()
            .map(Tracked::id)
            .collect();
        let upcoming: Vec<i64> = board
            .bucket_at(Tab::Upcoming, now)
            .into_iter()
            .map(Tracked::id)
            .collect();
        assert_eq!(available, vec![6]);
        assert_eq!(upcoming, vec![5]);
    }

    #[test]
    fn full_or_started_shifts_are_not_offered() {
        let full = Shift {
            volunteers_signed_up: Some(10),
            ..shift(1)
        };
        let active = Shift {
            status: Some(ShiftState::Active),
            ..shift(2)
        };
        let mut board = ShiftBoard::new(day());
        board.load(vec![full, active, shift(3)], |_| None);
        let ids: Vec<i64> = board
            .bucket(Tab::Available)
            .into_iter()
            .map(Tracked::id)
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn only_superseded_entries_are_reported() {
        let mut board = ShiftBoard::new(day());
        let paid = Shift {
            is_paid: Some(true),
            ..shift(1)
        };
        board.load(vec![paid, shift(2), shift(3)], |id| match id {
            1 => Some(entry(RosterStatus::PendingPayment)),
            2 => Some(entry(RosterStatus::Registered)),
            _ => Some(RosterEntry::new(
                RosterStatus::Registered,
                Utc::now() - Duration::days(3),
            )),
        });
        assert_eq!(board.superseded_entries(), vec![1]);
    }

    #[test]
    fn open_shifts_are_the_sign_up_list() {
        let full = Shift {
            volunteers_signed_up: Some(10),
            ..shift(1)
        };
        let mut board = ShiftBoard::new(day());
        board.load(vec![full, shift(2)], |_| None);
        assert!(!board.is_open(1));
        assert!(board.is_open(2));
        assert!(!board.is_open(3));
    }

    #[test]
    fn stats_cover_completed_shifts_only() {
        let done = Shift {
            is_paid: Some(true),
            payout_amount: Some(450.0),
            beneficiaries_served: Some(12),
            start_time: Some("09:00".into()),
            end_time: Some("13:30:00".into()),
            ..shift(1)
        };
        let pending = Shift {
            check_out_time: Some("T2".into()),
            payout_amount: Some(200.0),
            is_paid: Some(false),
            start_time: Some("09:00".into()),
            end_time: Some("10:00".into()),
            ..shift(2)
        };
        let mut board = ShiftBoard::new(day());
        board.load(vec![done, pending], |_| None);
        let stats = board.stats_at(Utc::now());
        assert_eq!(stats.total_earned, 450.0);
        assert_eq!(stats.total_hours, 4.5);
        assert_eq!(stats.total_beneficiaries, 12);
    }
}
