//! Activity type catalog
//!
//! Static MET table, loaded once and never mutated.

use serde::Serialize;

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityType {
    pub id: &'static str,
    pub name: &'static str,
    pub met: f64,
    pub category: &'static str,
}

const fn activity(id: &'static str, name: &'static str, met: f64, category: &'static str) -> ActivityType {
    ActivityType { id, name, met, category }
}

pub const ACTIVITY_TYPES: &[ActivityType] = &[
    // Walking
    activity("walking-slow", "Walking, slow (3 km/h)", 2.0, "Walking"),
    activity("walking-normal", "Walking, normal (4 km/h)", 3.0, "Walking"),
    activity("walking-fast", "Walking, brisk (5-6 km/h)", 4.5, "Walking"),
    activity("walking-very-fast", "Walking, very brisk (7 km/h)", 6.0, "Walking"),
    activity("walking-uphill", "Walking uphill", 6.0, "Walking"),
    // Running
    activity("running-slow", "Running, slow (6-7 km/h)", 8.0, "Running"),
    activity("running-normal", "Running, normal (8-9 km/h)", 9.5, "Running"),
    activity("running-fast", "Running, fast (10-11 km/h)", 11.5, "Running"),
    activity("running-very-fast", "Running, very fast (12+ km/h)", 13.5, "Running"),
    // Cycling
    activity("cycling-leisure", "Cycling, leisurely (<16 km/h)", 4.0, "Cycling"),
    activity("cycling-normal", "Cycling, moderate (16-19 km/h)", 6.0, "Cycling"),
    activity("cycling-fast", "Cycling, fast (20-22 km/h)", 8.0, "Cycling"),
    activity("cycling-very-fast", "Cycling, very fast (23+ km/h)", 10.0, "Cycling"),
    activity("cycling-uphill", "Cycling uphill", 10.0, "Cycling"),
    // Swimming
    activity("swimming-leisure", "Swimming, leisurely", 6.0, "Swimming"),
    activity("swimming-normal", "Swimming, moderate", 8.0, "Swimming"),
    activity("swimming-fast", "Swimming, fast", 10.0, "Swimming"),
    activity("swimming-crawl", "Swimming, front crawl", 10.0, "Swimming"),
    activity("swimming-butterfly", "Swimming, butterfly", 13.5, "Swimming"),
    // Strength
    activity("weight-training-light", "Weight training, light", 3.5, "Strength"),
    activity("weight-training-normal", "Weight training, moderate", 5.0, "Strength"),
    activity("weight-training-heavy", "Weight training, vigorous", 6.0, "Strength"),
    // Yoga and stretching
    activity("yoga", "Yoga", 3.0, "Yoga & stretching"),
    activity("stretching", "Stretching", 2.5, "Yoga & stretching"),
    activity("pilates", "Pilates", 3.0, "Yoga & stretching"),
    // Dancing
    activity("dancing-slow", "Dancing, slow", 3.0, "Dancing"),
    activity("dancing-normal", "Dancing, moderate", 4.5, "Dancing"),
    activity("dancing-fast", "Dancing, fast", 6.0, "Dancing"),
    // Sports
    activity("tennis", "Tennis", 7.0, "Sports"),
    activity("basketball", "Basketball", 8.0, "Sports"),
    activity("football", "Football", 8.0, "Sports"),
    activity("volleyball", "Volleyball", 3.0, "Sports"),
    activity("skiing", "Skiing", 7.0, "Sports"),
    activity("skating", "Ice skating", 7.0, "Sports"),
    // Everyday
    activity("cleaning", "House cleaning", 3.0, "Everyday"),
    activity("gardening", "Gardening", 4.0, "Everyday"),
    activity("cooking", "Cooking", 2.0, "Everyday"),
    activity("shopping", "Shopping", 2.5, "Everyday"),
];

/// Look up an activity type by id
pub fn find(id: &str) -> Option<&'static ActivityType> {
    ACTIVITY_TYPES.iter().find(|a| a.id == id.trim())
}

/// Case-insensitive match on name or category; blank query returns all
pub fn search(query: &str) -> Vec<&'static ActivityType> {
    let query = query.trim().to_lowercase();
    ACTIVITY_TYPES
        .iter()
        .filter(|a| {
            query.is_empty()
                || a.name.to_lowercase().contains(&query)
                || a.category.to_lowercase().contains(&query)
        })
        .collect()
}

/// Activities grouped by category, in catalog order
pub fn by_category<'a, I>(activities: I) -> Vec<(&'static str, Vec<&'static ActivityType>)>
where
    I: IntoIterator<Item = &'a &'static ActivityType>,
{
    let mut groups: Vec<(&'static str, Vec<&'static ActivityType>)> = Vec::new();
    for activity in activities {
        match groups.iter_mut().find(|(category, _)| *category == activity.category) {
            Some((_, members)) => members.push(*activity),
            None => groups.push((activity.category, vec![*activity])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_invariants() {
        let mut ids = HashSet::new();
        for activity in ACTIVITY_TYPES {
            assert!(activity.met > 0.0, "{} has non-positive MET", activity.id);
            assert!(ids.insert(activity.id), "duplicate id {}", activity.id);
        }
    }

    #[test]
    fn test_find() {
        let running = find("running-slow").unwrap();
        assert_eq!(running.met, 8.0);
        assert!(find("skydiving").is_none());
    }

    #[test]
    fn test_search_by_name_and_category() {
        let swims = search("swim");
        assert_eq!(swims.len(), 5);
        let sports = search("SPORTS");
        assert!(sports.iter().any(|a| a.id == "tennis"));
        assert_eq!(search("  ").len(), ACTIVITY_TYPES.len());
    }

    #[test]
    fn test_by_category_preserves_order() {
        let all = search("");
        let groups = by_category(&all);
        let names: Vec<_> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(names[0], "Walking");
        assert_eq!(names[1], "Running");
        assert_eq!(groups[0].1.len(), 5);
        assert_eq!(groups.iter().map(|(_, m)| m.len()).sum::<usize>(), ACTIVITY_TYPES.len());
    }
}
