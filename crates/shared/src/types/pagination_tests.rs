use super::*;
use rstest::rstest;

#[test]
fn test_full_page_has_cursor() {
    let page = CursorPage::from_rows(vec![1u32, 2, 3], 3, |&n| n);
    assert_eq!(page.next_cursor, Some(3));
}

#[test]
fn test_partial_page_has_no_cursor() {
    let page = CursorPage::from_rows(vec![1u32, 2], 3, |&n| n);
    assert_eq!(page.next_cursor, None);
}

#[test]
fn test_empty_page_has_no_cursor() {
    let page = CursorPage::from_rows(Vec::<u32>::new(), 3, |&n| n);
    assert!(page.items.is_empty());
    assert_eq!(page.next_cursor, None);
}

#[rstest]
#[case(0, 1)]
#[case(1, 1)]
#[case(50, 50)]
#[case(100, 100)]
#[case(MAX_PAGE_LIMIT, MAX_PAGE_LIMIT)]
#[case(MAX_PAGE_LIMIT + 1, MAX_PAGE_LIMIT)]
fn test_requested_limit_clamped(#[case] requested: u32, #[case] expected: u32) {
    let req = PageRequest::<u32>::first(requested);
    assert_eq!(req.limit_or(DEFAULT_PAGE_LIMIT), expected);
}

#[test]
fn test_absent_limit_uses_default() {
    let req = PageRequest::<u32>::default();
    assert!(req.cursor.is_none());
    assert_eq!(req.limit_or(25), 25);
}

#[test]
fn test_default_above_max_is_clamped() {
    let req = PageRequest::<u32>::default();
    assert_eq!(req.limit_or(MAX_PAGE_LIMIT + 1), MAX_PAGE_LIMIT);
}
