/// Default batch size, matching the beacon balances endpoint limit
pub const DEFAULT_CHUNK_SIZE: usize = 250;

/// Split `items` into consecutive chunks of at most `chunk_size` elements
///
/// The last chunk holds the remainder. A `chunk_size` of 0 is treated as 1.
///
/// # Examples
/// ```
/// use web3_utils::utils::chunks::divide_chunks;
///
/// let chunks = divide_chunks(&[1, 2, 3, 4, 5], 2);
/// assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub fn divide_chunks<T: Clone>(items: &[T], chunk_size: usize) -> Vec<Vec<T>> {
    items
        .chunks(chunk_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}
