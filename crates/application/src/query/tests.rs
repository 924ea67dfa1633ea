use super::{OrderKey, Predicate, SortValue, Specification};

fn evens() -> Predicate<i64> {
    Predicate::from_fn(|value: &i64| value % 2 == 0)
}

fn small() -> Predicate<i64> {
    Predicate::from_fn(|value: &i64| *value < 10)
}

fn matching(predicate: &Predicate<i64>, values: &[i64]) -> Vec<i64> {
    values
        .iter()
        .copied()
        .filter(|value| predicate.matches(value))
        .collect()
}

#[test]
fn identity_predicate_is_the_composition_unit() {
    let values = [1, 2, 3, 4, 5, 6];
    let left = Predicate::True.and(evens());
    let right = evens().and(Predicate::True);

    assert_eq!(matching(&left, &values), matching(&evens(), &values));
    assert_eq!(matching(&right, &values), matching(&evens(), &values));
}

#[test]
fn and_composition_is_commutative_in_observable_results() {
    let values = [1, 2, 3, 4, 8, 11, 12, 20];
    let even_then_small = evens().and(small());
    let small_then_even = small().and(evens());

    assert_eq!(
        matching(&even_then_small, &values),
        matching(&small_then_even, &values)
    );
    assert_eq!(matching(&even_then_small, &values), vec![2, 4, 8]);
}

#[test]
fn composition_does_not_mutate_inputs() {
    let evens = evens();
    let combined = evens.clone().and(small());

    assert!(evens.matches(&20));
    assert!(!combined.matches(&20));
}

#[test]
fn both_operands_see_the_same_entity() {
    let counted = Predicate::from_fn(|value: &i64| *value == 4).and(evens());
    assert!(counted.matches(&4));
    assert!(!counted.matches(&6));
}

#[test]
fn new_specification_is_unfiltered_and_unpaged() {
    let spec: Specification<i64> = Specification::new();
    assert!(spec.matches(&42));
    assert!(!spec.paging_enabled());
    assert!(spec.order().is_none());
    assert!(spec.includes().is_empty());
}

#[test]
fn paging_computes_skip_from_clamped_page_inputs() {
    let spec: Specification<i64> = Specification::new().paged(3, 5);
    assert!(spec.paging_enabled());
    assert_eq!(spec.skip(), 10);
    assert_eq!(spec.take(), 5);
}

#[test]
fn page_zero_behaves_like_page_one() {
    let zero: Specification<i64> = Specification::new().paged(0, 10);
    let one: Specification<i64> = Specification::new().paged(1, 10);
    assert_eq!(zero.skip(), one.skip());
    assert_eq!(zero.take(), one.take());
}

#[test]
fn negative_page_size_falls_back_to_default() {
    let spec: Specification<i64> = Specification::new().paged(1, -5);
    assert_eq!(spec.take(), 10);
    assert_eq!(spec.skip(), 0);
}

#[test]
fn includes_keep_insertion_order() {
    let spec: Specification<i64> = Specification::new().include("pet").include("owner");
    assert_eq!(spec.includes(), ["pet", "owner"]);
}

#[test]
fn order_key_respects_direction() {
    let ascending = OrderKey::ascending(|value: &i64| SortValue::Integer(*value));
    let descending = OrderKey::descending(|value: &i64| SortValue::Integer(*value));

    assert_eq!(ascending.compare(&1, &2), std::cmp::Ordering::Less);
    assert_eq!(descending.compare(&1, &2), std::cmp::Ordering::Greater);
}

#[test]
fn text_sort_values_are_case_normalized() {
    assert_eq!(SortValue::text("Persian"), SortValue::text("pERSIAN"));
}
