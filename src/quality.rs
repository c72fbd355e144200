/// Position of the preferred tier in the tiers the player currently offers
///
/// Works for any tier representation: [`VideoQuality`](crate::VideoQuality)
/// lists, parsed [`YouTubeLabel`](crate::YouTubeLabel)s, or raw label strings.
/// Returns `None` when the player does not offer the preferred tier.
pub fn quality_index<T: PartialEq>(offered: &[T], preferred: &T) -> Option<usize> {
    offered.iter().position(|quality| quality == preferred)
}
