use chrono::TimeDelta;
use tracing::info;

use crate::models::Caption;

/// Move every caption by `delta`
///
/// Times wrap at midnight, so the result is wrong for any caption that starts
/// or ends up on the other side of the 24-hour boundary.
pub fn shift_captions(captions: &mut [Caption], delta: TimeDelta) -> usize {
    for caption in captions.iter_mut() {
        caption.shift(delta);
    }
    info!(
        "Shifted {} captions by {:.3}s",
        captions.len(),
        delta.num_milliseconds() as f64 / 1000.0
    );
    captions.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_shift_captions_both_ways() {
        let start = NaiveTime::from_hms_milli_opt(0, 1, 0, 0).unwrap();
        let end = NaiveTime::from_hms_milli_opt(0, 1, 2, 500).unwrap();
        let mut captions = vec![Caption::new(start, end, "hi")];

        assert_eq!(shift_captions(&mut captions, TimeDelta::seconds(90)), 1);
        assert_eq!(captions[0].start, NaiveTime::from_hms_opt(0, 2, 30).unwrap());
        assert_eq!(captions[0].end, NaiveTime::from_hms_milli_opt(0, 2, 32, 500).unwrap());

        shift_captions(&mut captions, TimeDelta::seconds(-90));
        assert_eq!(captions[0].start, start);
        assert_eq!(captions[0].end, end);
        assert_eq!(captions[0].text, "hi");
    }
}
