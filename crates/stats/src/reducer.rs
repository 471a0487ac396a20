use risk_protocol::ScoreTriple;

/// Reduces score triples to one triple, axis by axis.
///
/// Each axis keeps the minimum of its strictly positive values, or zero when
/// none is positive. Historically this rule was exposed under a "max value"
/// name; the behaviour is the minimum and risk reports depend on it.
pub struct ScoreReducer;

impl ScoreReducer {
    /// Reduce any number of triples. Empty input yields the all-zero triple.
    pub fn reduce<'a, I>(triples: I) -> ScoreTriple
    where
        I: IntoIterator<Item = &'a ScoreTriple>,
    {
        let (k, v, p) = triples
            .into_iter()
            .fold((None, None, None), |(k, v, p), triple| {
                (
                    min_positive(k, triple.k),
                    min_positive(v, triple.v),
                    min_positive(p, triple.p),
                )
            });

        ScoreTriple::new(k.unwrap_or(0), v.unwrap_or(0), p.unwrap_or(0))
    }

    /// Reduce a single triple (zeroes out non-positive axes)
    pub fn reduce_one(triple: &ScoreTriple) -> ScoreTriple {
        Self::reduce(std::iter::once(triple))
    }
}

fn min_positive(current: Option<i64>, value: i64) -> Option<i64> {
    if value <= 0 {
        return current;
    }
    Some(current.map_or(value, |current| current.min(value)))
}
