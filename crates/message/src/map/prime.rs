//! Prime helpers used to size the bucket array of [`HeaderMap`](super::HeaderMap).

/// Returns true if `n` is prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    // every prime above 3 is of the form 6k +/- 1
    let mut i = 5usize;
    while i.checked_mul(i).is_some_and(|square| square <= n) {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Returns the smallest prime greater than or equal to `n`.
pub fn next_prime(n: usize) -> usize {
    if n <= 2 {
        return 2;
    }

    let mut candidate = if n % 2 == 0 { n + 1 } else { n };
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_primes() {
        let primes: Vec<usize> = (0..40).filter(|n| is_prime(*n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37]);
    }

    #[test]
    fn next_prime_is_inclusive() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(11), 11);
        assert_eq!(next_prime(12), 13);
        assert_eq!(next_prime(19), 19);
        assert_eq!(next_prime(20), 23);
        assert_eq!(next_prime(32), 37);
    }

    #[test]
    fn larger_values() {
        assert!(is_prime(7919));
        assert!(!is_prime(7917));
        assert_eq!(next_prime(7908), 7919);
    }
}
