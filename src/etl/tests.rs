use polars::prelude::*;

mod binning;
mod io;

/// Eleven claims with the raw export's header spelling, one malformed age,
/// gaps in `Credit Score` and `Annual Mileage` and one missing accident count.
fn raw_claims() -> PolarsResult<DataFrame> {
    df!(
        "ID" => &[1001i64, 1002, 1003, 1004, 1005, 1006, 1007, 1008, 1009, 1010, 1011],
        "AGE" => &["10", "16", "25", "26", "40", "41", "65", "66", "100", "101", "bad"],
        "Credit Score" => &[
            Some(0.629), Some(0.357), None, Some(0.493), Some(0.388), Some(0.476),
            Some(0.424), Some(0.539), Some(0.512), Some(0.410), Some(0.600),
        ],
        "Annual Mileage" => &[
            Some(12000.0), Some(16000.0), Some(11000.0), None, Some(13000.0), None,
            Some(13000.0), Some(12000.0), Some(9000.0), Some(10000.0), Some(14000.0),
        ],
        "Past Accidents" => &[
            Some(0i64), Some(0), Some(0), Some(0), Some(2), Some(3),
            Some(0), Some(1), Some(0), Some(0), None,
        ],
        "Vehicle Type" => &[
            "sedan", "sedan", "sports car", "sedan", "sedan", "sedan",
            "sedan", "sports car", "sedan", "sedan", "sedan",
        ]
    )
}
