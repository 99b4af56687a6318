use std::collections::BTreeSet;

use super::*;
use crate::cuisine::CuisineTable;
use crate::geo::distance_miles;
use crate::types::Coordinate;

fn candidate(id: &str, name: &str, rating: f64, distance_miles: f64) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: name.to_string(),
        address: String::new(),
        rating,
        location: Coordinate::new(0.0, 0.0).unwrap(),
        distance_miles,
        category_tags: BTreeSet::new(),
    }
}

fn ids(candidates: &[Candidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.id.as_str()).collect()
}

fn fixture() -> Vec<Candidate> {
    vec![
        candidate("a", "Taqueria Uno", 4.6, 0.4),
        candidate("b", "Sushi Zen", 3.2, 2.0),
        candidate("c", "Corner Diner", 0.0, 3.5),
        candidate("d", "Pho Saigon", 4.1, 7.9),
        candidate("e", "Trattoria Roma", 4.8, 12.0),
        candidate("f", "Burger Barn", 2.5, 1.1),
    ]
}

fn excluded(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|k| (*k).to_string()).collect()
}

#[test]
fn by_distance_keeps_boundary_value() {
    let list = vec![candidate("a", "A", 0.0, 5.0), candidate("b", "B", 0.0, 5.000_1)];
    assert_eq!(ids(&by_distance(&list, 5.0)), vec!["a"]);
}

#[test]
fn by_distance_output_is_exact_qualifying_subset() {
    let list = fixture();
    for max in [0.0, 0.4, 1.0, 3.5, 8.0, 100.0] {
        let kept = by_distance(&list, max);
        assert!(kept.iter().all(|c| c.distance_miles <= max));
        let expected = list.iter().filter(|c| c.distance_miles <= max).count();
        assert_eq!(kept.len(), expected, "max={max}");
    }
}

#[test]
fn by_min_rating_zero_is_identity() {
    let list = fixture();
    assert_eq!(by_min_rating(&list, 0.0), list);
}

#[test]
fn unrated_candidate_is_kept_without_floor_and_dropped_with_one() {
    let list = vec![candidate("z", "Unrated Place", 0.0, 1.0)];
    assert_eq!(ids(&by_min_rating(&list, 0.0)), vec!["z"]);
    assert!(by_min_rating(&list, 3.0).is_empty());
}

#[test]
fn by_min_rating_is_inclusive() {
    let list = fixture();
    assert_eq!(ids(&by_min_rating(&list, 4.1)), vec!["a", "d", "e"]);
}

#[test]
fn by_excluded_categories_empty_is_identity() {
    let list = fixture();
    let table = CuisineTable::builtin();
    assert_eq!(by_excluded_categories(&list, &BTreeSet::new(), &table), list);
}

#[test]
fn by_excluded_categories_drops_keyword_matches() {
    let list = fixture();
    let table = CuisineTable::builtin();
    let kept = by_excluded_categories(&list, &excluded(&["mexican", "vietnamese"]), &table);
    assert_eq!(ids(&kept), vec!["b", "c", "e", "f"]);
}

#[test]
fn apply_filters_combines_all_three() {
    let list = fixture();
    let table = CuisineTable::builtin();
    let filters = QueryFilters::new(10.0, 3.0, ["japanese"]).unwrap();
    assert_eq!(ids(&apply_filters(&list, &filters, &table)), vec!["a", "d"]);
}

#[test]
fn composition_is_order_independent() {
    let list = fixture();
    let table = CuisineTable::builtin();
    let ex = excluded(&["italian", "american"]);
    let max = 8.0;
    let floor = 3.0;

    type Step<'a> = Box<dyn Fn(&[Candidate]) -> Vec<Candidate> + 'a>;
    let steps: [Step<'_>; 3] = [
        Box::new(|c: &[Candidate]| by_distance(c, max)),
        Box::new(|c: &[Candidate]| by_min_rating(c, floor)),
        Box::new(|c: &[Candidate]| by_excluded_categories(c, &ex, &table)),
    ];
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let reference = orders[0]
        .iter()
        .fold(list.clone(), |acc, &i| steps[i](acc.as_slice()));
    assert_eq!(ids(&reference), vec!["a", "b", "d"]);

    for order in &orders[1..] {
        let result = order.iter().fold(list.clone(), |acc, &i| steps[i](acc.as_slice()));
        assert_eq!(result, reference, "order {order:?}");
    }
}

#[test]
fn filters_can_be_rerun_without_touching_input() {
    let list = fixture();
    let table = CuisineTable::builtin();
    let narrow = QueryFilters::new(1.0, 0.0, Vec::<String>::new()).unwrap();
    let wide = QueryFilters::new(20.0, 0.0, Vec::<String>::new()).unwrap();

    assert_eq!(apply_filters(&list, &narrow, &table).len(), 1);
    assert_eq!(apply_filters(&list, &wide, &table).len(), list.len());
    assert_eq!(list, fixture());
}

#[test]
fn scenario_three_candidates_within_ten_miles() {
    let origin = Coordinate::new(37.7749, -122.4194).unwrap();
    let near = Coordinate::new(37.7749 + 0.5 / 69.0, -122.4194).unwrap();
    let mid = Coordinate::new(37.7749 + 5.0 / 69.0, -122.4194).unwrap();
    let far = Coordinate::new(37.7749 + 15.0 / 69.0, -122.4194).unwrap();

    let list: Vec<Candidate> = [("near", near), ("mid", mid), ("far", far)]
        .into_iter()
        .map(|(id, location)| Candidate {
            location,
            distance_miles: distance_miles(origin, location),
            ..candidate(id, id, 0.0, 0.0)
        })
        .collect();

    assert_eq!(ids(&by_distance(&list, 10.0)), vec!["near", "mid"]);
}
