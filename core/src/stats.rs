//! Aggregate counts over loaded school records.

use crate::index::{SchoolRecord, CITY_FIELD, LOCALE_FIELD, STATE_FIELD};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityCount {
    pub state: String,
    pub city: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolCounts {
    pub total: usize,
    /// In order of first appearance.
    pub by_state: Vec<(String, usize)>,
    /// Sorted by locale code.
    pub by_locale: Vec<(String, usize)>,
    /// City with the most schools; the earliest seen wins a tie.
    pub busiest_city: Option<CityCount>,
    /// Distinct (state, city) pairs, so same-named cities in different states count separately.
    pub unique_cities: usize,
}

impl SchoolCounts {
    pub fn from_records(records: &[SchoolRecord]) -> Self {
        let by_state = count_in_order(records.iter().filter_map(|r| r.get(STATE_FIELD).cloned()));
        let by_locale: BTreeMap<String, usize> = count_in_order(records.iter().filter_map(|r| r.get(LOCALE_FIELD).cloned()))
            .into_iter()
            .collect();
        let by_city = count_in_order(records.iter().filter_map(|r| {
            Some((r.get(STATE_FIELD)?.clone(), r.get(CITY_FIELD)?.clone()))
        }));

        let mut busiest_city: Option<CityCount> = None;
        for ((state, city), count) in &by_city {
            if busiest_city.as_ref().map_or(true, |best| *count > best.count) {
                busiest_city = Some(CityCount { state: state.clone(), city: city.clone(), count: *count });
            }
        }

        Self {
            total: records.len(),
            by_state,
            by_locale: by_locale.into_iter().collect(),
            busiest_city,
            unique_cities: by_city.len(),
        }
    }
}

fn count_in_order<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + std::hash::Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            counts.push((key, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }
    counts
}

impl fmt::Display for SchoolCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total schools: {}", self.total)?;
        writeln!(f, "Schools by State:")?;
        for (state, count) in &self.by_state {
            writeln!(f, "{state}: {count}")?;
        }
        writeln!(f, "Schools by Metro-centric locale:")?;
        for (locale, count) in &self.by_locale {
            writeln!(f, "{locale}: {count}")?;
        }
        if let Some(city) = &self.busiest_city {
            writeln!(f, "City with most schools: {} ({} schools)", city.city, city.count)?;
        }
        write!(f, "Unique cities with at least one school: {}", self.unique_cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::NAME_FIELD;

    fn record(state: &str, city: &str, locale: &str) -> SchoolRecord {
        SchoolRecord::from([
            (NAME_FIELD.to_string(), "X".to_string()),
            (STATE_FIELD.to_string(), state.to_string()),
            (CITY_FIELD.to_string(), city.to_string()),
            (LOCALE_FIELD.to_string(), locale.to_string()),
        ])
    }

    #[test]
    fn counts_by_state_locale_and_city() {
        let records = vec![
            record("OH", "DAYTON", "4"),
            record("IL", "SPRINGFIELD", "2"),
            record("OH", "SPRINGFIELD", "4"),
            record("IL", "SPRINGFIELD", "1"),
            record("OH", "DAYTON", "3"),
        ];
        let counts = SchoolCounts::from_records(&records);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.by_state, vec![("OH".to_string(), 3), ("IL".to_string(), 2)]);
        assert_eq!(
            counts.by_locale,
            vec![("1".to_string(), 1), ("2".to_string(), 1), ("3".to_string(), 1), ("4".to_string(), 2)]
        );
        assert_eq!(counts.unique_cities, 3);
        // OH/DAYTON and IL/SPRINGFIELD both have two; DAYTON was seen first.
        let busiest = counts.busiest_city.unwrap();
        assert_eq!((busiest.state.as_str(), busiest.city.as_str(), busiest.count), ("OH", "DAYTON", 2));
    }

    #[test]
    fn report_lines() {
        let counts = SchoolCounts::from_records(&[record("OH", "DAYTON", "4"), record("OH", "DAYTON", "4")]);
        let text = counts.to_string();
        assert!(text.starts_with("Total schools: 2\n"));
        assert!(text.contains("City with most schools: DAYTON (2 schools)"));
        assert!(text.ends_with("Unique cities with at least one school: 1"));
    }

    #[test]
    fn empty_input() {
        let counts = SchoolCounts::from_records(&[]);
        assert_eq!(counts, SchoolCounts::default());
    }
}
