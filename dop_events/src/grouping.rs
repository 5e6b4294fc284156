/// Splits `items` into the runs of consecutive elements that share the same key.
///
/// The runs come out in the order they are met. Nothing is sorted: two runs
/// that are separated by another key stay separate, even with equal keys.
pub fn group_runs<'a, T, K, F>(items: &'a [T], key: F) -> Vec<(K, &'a [T])>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut res: Vec<(K, &'a [T])> = Vec::new();
    let mut start = 0;
    while start < items.len() {
        let k = key(&items[start]);
        let mut end = start + 1;
        while end < items.len() && key(&items[end]) == k {
            end += 1;
        }
        res.push((k, &items[start..end]));
        start = end;
    }
    res
}
