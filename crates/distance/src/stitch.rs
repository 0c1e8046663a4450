/// Join per-segment polylines into one continuous path. Consecutive segments
/// share their connecting vertex, so the first point of every segment after
/// the first is dropped.
pub fn stitch_segments(segments: &[Vec<[f64; 2]>]) -> Vec<[f64; 2]> {
    let mut path: Vec<[f64; 2]> = Vec::new();
    for segment in segments {
        let skip = usize::from(!path.is_empty() && !segment.is_empty());
        path.extend(segment.iter().skip(skip));
    }
    trim_closing_point(path)
}

/// Drop the final vertex when the path accidentally closes on itself.
fn trim_closing_point(mut path: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    if path.len() > 2 && path.first() == path.last() {
        path.pop();
    }
    path
}
