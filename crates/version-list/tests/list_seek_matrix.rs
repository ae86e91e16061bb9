use version_list::{Find, VersionList};

fn sample() -> VersionList {
    let list = VersionList::new();
    list.put(10, "ten");
    list.put(20, "twenty");
    list.put(30, "thirty");
    list
}

fn ver(list: &VersionList, v: i64, mode: Find) -> Option<i64> {
    list.get(v, mode).map(|e| e.ver())
}

#[test]
fn seek_matrix() {
    let list = sample();
    let cases: &[(i64, Find, Option<i64>)] = &[
        (20, Find::Exact, Some(20)),
        (15, Find::Exact, None),
        (15, Find::Prev, Some(10)),
        (20, Find::Prev, Some(10)),
        (10, Find::Prev, None),
        (5, Find::Prev, None),
        (i64::MAX, Find::Prev, Some(30)),
        (15, Find::Next, Some(20)),
        (20, Find::Next, Some(30)),
        (30, Find::Next, None),
        (i64::MIN, Find::Next, Some(10)),
        (20, Find::Upto, Some(20)),
        (25, Find::Upto, Some(20)),
        (9, Find::Upto, None),
        (25, Find::Nearest, Some(20)),
        (20, Find::Nearest, Some(20)),
        (5, Find::Nearest, Some(10)),
        (35, Find::Nearest, Some(30)),
    ];
    for &(v, mode, expected) in cases {
        assert_eq!(ver(&list, v, mode), expected, "get({v}, {mode})");
    }
}

#[test]
fn nearest_prefers_past() {
    let list = VersionList::new();
    list.put(100, "a");
    list.put(102, "b");
    // 101 is equally close to both neighbours; the past wins.
    assert_eq!(ver(&list, 101, Find::Nearest), Some(100));
    list.del(100, Find::Exact);
    assert_eq!(ver(&list, 101, Find::Nearest), Some(102));
}

#[test]
fn uniqueness() {
    let list = VersionList::new();
    list.put(7, "a");
    assert_eq!(list.len(), 1);
    list.put(7, "b");
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(7, Find::Exact).unwrap().val(), b"b");
}

#[test]
fn del_by_mode() {
    let list = sample();
    let removed = list.del(25, Find::Upto).unwrap();
    assert_eq!(removed.ver(), 20);
    assert_eq!(removed.val(), b"twenty");
    assert!(!removed.is_attached());
    assert_eq!(list.len(), 2);
    assert!(list.del(25, Find::Exact).is_none());
    assert_eq!(list.len(), 2);
}

#[test]
fn exp_removes_inclusive_prefix() {
    let list = sample();
    let e = list.exp(20, Find::Upto).unwrap();
    assert_eq!(e.ver(), 20);
    assert_eq!(e.val(), b"twenty");
    assert_eq!(list.len(), 1);
    assert_eq!(list.min().map(|e| e.ver()), Some(30));
    list.assert_valid().unwrap();
}

#[test]
fn exp_with_prev_keeps_boundary() {
    let list = sample();
    let e = list.exp(30, Find::Prev).unwrap();
    assert_eq!(e.ver(), 20);
    assert_eq!(list.len(), 1);
    assert_eq!(list.min().map(|e| e.ver()), Some(30));
}

#[test]
fn exp_without_match_removes_nothing() {
    let list = sample();
    assert!(list.exp(5, Find::Upto).is_none());
    assert!(list.exp(15, Find::Exact).is_none());
    assert_eq!(list.len(), 3);
}

#[test]
fn exp_everything() {
    let list = sample();
    assert_eq!(list.exp(i64::MAX, Find::Nearest).map(|e| e.ver()), Some(30));
    assert!(list.is_empty());
    assert!(list.min().is_none());
    assert!(list.max().is_none());
}

#[test]
fn min_max_len() {
    let empty = VersionList::new();
    assert!(empty.min().is_none());
    assert!(empty.max().is_none());
    assert_eq!(empty.len(), 0);

    let list = sample();
    assert_eq!(list.min().map(|e| e.ver()), Some(10));
    assert_eq!(list.max().map(|e| e.ver()), Some(30));
    assert_eq!(list.len(), 3);
}

#[test]
fn walk_ascends_and_stops_early() {
    let list = VersionList::new();
    for v in [5, 3, 9, 1, 7] {
        list.put(v, Vec::new());
    }

    let mut all = Vec::new();
    list.walk(|e| {
        all.push(e.ver());
        true
    });
    assert_eq!(all, vec![1, 3, 5, 7, 9]);

    let mut some = Vec::new();
    list.walk(|e| {
        some.push(e.ver());
        e.ver() < 5
    });
    assert_eq!(some, vec![1, 3, 5]);
}

#[test]
fn clr_empties_list() {
    let list = sample();
    list.clr();
    assert!(list.is_empty());
    assert!(list.min().is_none());
    list.put(1, "again");
    assert_eq!(list.len(), 1);
    list.assert_valid().unwrap();
}
