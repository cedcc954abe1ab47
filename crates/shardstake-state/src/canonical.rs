/// Sorts `items` into canonical encoding order.
///
/// The order is descending byte-wise lexicographic on the string returned by
/// `key`. The sort is stable, so equal keys keep their relative order. All
/// encoders must use exactly this order; it is part of the wire format.
pub fn canonical_order<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| key(b).cmp(key(a)));
}
