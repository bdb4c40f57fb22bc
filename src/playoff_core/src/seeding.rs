//! Conference standings: division winners first, then wildcards.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::clinch::{is_clinched, is_eliminated};
use crate::config::SeasonRules;
use crate::error::TiebreakError;
use crate::league::League;
use crate::records::{get_records, TeamRecord};
use crate::schedule::Schedule;
use crate::team::{Conference, Team};
use crate::tiebreak::{break_division_tie, break_ties, TiebreakKind};

/// Split records already sorted by win fraction into runs of equal `wl`.
pub fn group_by_wl<'a>(sorted: Vec<&'a TeamRecord>) -> Vec<Vec<&'a TeamRecord>> {
    let mut groups: Vec<Vec<&TeamRecord>> = Vec::new();
    for record in sorted {
        match groups.last_mut() {
            Some(group) if group[0].record.wl() == record.record.wl() => group.push(record),
            _ => groups.push(vec![record]),
        }
    }
    groups
}

/// Stable sort by win fraction, best first, grouped by equal `wl`.
pub fn sort_records<'a, I>(records: I) -> Vec<Vec<&'a TeamRecord>>
where
    I: IntoIterator<Item = &'a TeamRecord>,
{
    let mut sorted: Vec<&TeamRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.record.wl().total_cmp(&a.record.wl()));
    group_by_wl(sorted)
}

/// Full ordering: sort by `wl`, then break every tied group.
pub fn rank<'a, I>(records: I, is_division_tie: bool) -> Result<Vec<&'a TeamRecord>, TiebreakError>
where
    I: IntoIterator<Item = &'a TeamRecord>,
{
    let mut ordered = Vec::new();
    for group in sort_records(records) {
        ordered.extend(break_ties(group, is_division_tie)?);
    }
    Ok(ordered)
}

/// Leader of each division of `conference`, in North, South, East, West order.
///
/// Only the group tied for the best record of a division is tie-broken.
pub fn division_winners<'a>(
    records: &[&'a TeamRecord],
    conference: Conference,
) -> Result<Vec<&'a TeamRecord>, TiebreakError> {
    let mut winners = Vec::with_capacity(conference.divisions().len());
    for division in conference.divisions() {
        let groups = sort_records(
            records
                .iter()
                .copied()
                .filter(|record| record.division == division),
        );
        let Some(mut leaders) = groups.into_iter().next() else {
            continue;
        };
        if leaders.len() > 1 {
            leaders = break_division_tie(leaders)?;
        }
        if let Some(&winner) = leaders.first() {
            winners.push(winner);
        }
    }
    Ok(winners)
}

/// One conference's standings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConferenceSeeding {
    pub conference: Conference,

    /// Seeds 1-4
    pub division_winners: Vec<String>,

    /// Seeds 5-7
    pub wildcards: Vec<String>,

    /// Non-playoff teams, best first
    pub remaining: Vec<String>,

    pub clinched: BTreeSet<String>,
    pub eliminated: BTreeSet<String>,
}

impl ConferenceSeeding {
    /// The seven playoff seeds in order.
    pub fn seeding(&self) -> Vec<&str> {
        self.playoff_teams().collect()
    }

    pub fn playoff_teams(&self) -> impl Iterator<Item = &str> {
        self.division_winners
            .iter()
            .chain(self.wildcards.iter())
            .map(String::as_str)
    }

    /// Every team of the conference, seeds first.
    pub fn standings(&self) -> impl Iterator<Item = &str> {
        self.playoff_teams()
            .chain(self.remaining.iter().map(String::as_str))
    }

    /// Zero-based place in the standings.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.standings().position(|team| team == code)
    }

    pub fn is_playoff_team(&self, code: &str) -> bool {
        self.playoff_teams().any(|team| team == code)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Seeding {
    pub afc: ConferenceSeeding,
    pub nfc: ConferenceSeeding,
}

impl Seeding {
    pub fn conference(&self, conference: Conference) -> &ConferenceSeeding {
        match conference {
            Conference::Afc => &self.afc,
            Conference::Nfc => &self.nfc,
        }
    }
}

fn codes(records: &[&TeamRecord]) -> Vec<String> {
    records.iter().map(|record| record.code.clone()).collect()
}

fn conference_records<'a>(records: &'a [TeamRecord], conference: Conference) -> Vec<&'a TeamRecord> {
    records
        .iter()
        .filter(|record| record.division.conference() == conference)
        .collect()
}

/// Seed one conference from the records of its teams.
pub fn conference_seeding(
    records: &[&TeamRecord],
    conference: Conference,
    rules: &SeasonRules,
    include_eliminations: bool,
) -> Result<ConferenceSeeding, TiebreakError> {
    let winners = division_winners(records, conference)?;
    let winners = match rules.division_winner_tiebreak {
        TiebreakKind::Division => rank(winners, true)?,
        TiebreakKind::Conference => rank(winners, false)?,
    };

    let others = rank(
        records
            .iter()
            .copied()
            .filter(|record| !winners.iter().any(|winner| winner.code == record.code)),
        false,
    )?;
    let spots = rules.wildcard_spots.min(others.len());
    let (wildcards, remaining) = others.split_at(spots);

    let mut seeding = ConferenceSeeding {
        conference,
        division_winners: codes(&winners),
        wildcards: codes(wildcards),
        remaining: codes(remaining),
        clinched: BTreeSet::new(),
        eliminated: BTreeSet::new(),
    };

    if include_eliminations {
        let winner_codes: Vec<&str> = seeding.division_winners.iter().map(String::as_str).collect();
        let wildcard_codes: Vec<&str> = seeding.wildcards.iter().map(String::as_str).collect();
        for record in records {
            let code = record.code.as_str();
            if is_clinched(records, &winner_codes, &wildcard_codes, code, rules) {
                seeding.clinched.insert(code.to_string());
            }
            if is_eliminated(records, &winner_codes, &wildcard_codes, code, rules) {
                seeding.eliminated.insert(code.to_string());
            }
        }
    }

    debug!(
        %conference,
        seeds = ?seeding.seeding(),
        clinched = seeding.clinched.len(),
        eliminated = seeding.eliminated.len(),
        "conference seeded"
    );
    Ok(seeding)
}

/// Seed both conferences of `league` from `schedule`.
pub fn get_seeding(
    schedule: &Schedule,
    league: &League,
    include_eliminations: bool,
) -> Result<Seeding, TiebreakError> {
    let teams: Vec<&Team> = league.teams().iter().collect();
    let records = get_records(schedule, league, &teams);
    let rules = league.rules();

    Ok(Seeding {
        afc: conference_seeding(
            &conference_records(&records, Conference::Afc),
            Conference::Afc,
            rules,
            include_eliminations,
        )?,
        nfc: conference_seeding(
            &conference_records(&records, Conference::Nfc),
            Conference::Nfc,
            rules,
            include_eliminations,
        )?,
    })
}

/// The set of playoff teams of one conference, without ordering them.
///
/// Division winners are left unordered and wildcards are taken one `wl`
/// group at a time; only the group straddling the last spot is tie-broken.
/// Yields the same set as [`conference_seeding`] whenever that succeeds.
pub fn playoff_teams<'a>(
    records: &[&'a TeamRecord],
    conference: Conference,
    rules: &SeasonRules,
) -> Result<Vec<&'a TeamRecord>, TiebreakError> {
    let mut teams = division_winners(records, conference)?;
    let spots = rules.wildcard_spots;

    let others = records
        .iter()
        .copied()
        .filter(|record| !teams.iter().any(|winner| winner.code == record.code));

    let mut wildcards: Vec<&TeamRecord> = Vec::with_capacity(spots);
    for group in sort_records(others) {
        let spots_left = spots - wildcards.len();
        if spots_left == 0 {
            break;
        }
        if group.len() > spots_left {
            let broken = break_ties(group, false)?;
            wildcards.extend(broken.into_iter().take(spots_left));
        } else {
            wildcards.extend(group);
        }
    }

    teams.extend(wildcards);
    Ok(teams)
}

/// Playoff teams of both conferences, AFC first.
pub fn league_playoff_teams(
    schedule: &Schedule,
    league: &League,
) -> Result<Vec<String>, TiebreakError> {
    let teams: Vec<&Team> = league.teams().iter().collect();
    let records = get_records(schedule, league, &teams);

    let mut playoff = Vec::new();
    for conference in Conference::ALL {
        let conference_records = conference_records(&records, conference);
        let qualified = playoff_teams(&conference_records, conference, league.rules())?;
        playoff.extend(qualified.into_iter().map(|record| record.code.clone()));
    }
    Ok(playoff)
}
