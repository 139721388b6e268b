use crate::error::ApiError;

/// A validated image-map region. Parsed once at the request boundary; the
/// canonical coordinate string is what gets persisted and handed to clients
/// for drawing the clickable overlay. Coordinates are geometric metadata
/// only and are not checked against the image's pixel bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagShape {
    Rect { x: i32, y: i32, w: i32, h: i32 },
    Circle { cx: i32, cy: i32, r: i32 },
    Poly { points: Vec<(i32, i32)> },
}

impl TagShape {
    /// Parses a shape discriminator plus a delimited coordinate list. The
    /// discriminator is checked first, so an unknown shape reports
    /// `InvalidShape` no matter what the coordinates look like.
    ///
    /// Arity is fixed per shape: rect takes 4 numbers, circle 3, poly an
    /// even count of at least 6.
    pub fn parse(shape: &str, coords: &str) -> Result<Self, ApiError> {
        match shape {
            "rect" => {
                let numbers = parse_coords(coords)?;
                match numbers[..] {
                    [x, y, w, h] => Ok(TagShape::Rect { x, y, w, h }),
                    _ => Err(ApiError::InvalidCoordinates(format!(
                        "rect takes 4 coordinates, got {}",
                        numbers.len()
                    ))),
                }
            }
            "circle" => {
                let numbers = parse_coords(coords)?;
                match numbers[..] {
                    [cx, cy, r] => Ok(TagShape::Circle { cx, cy, r }),
                    _ => Err(ApiError::InvalidCoordinates(format!(
                        "circle takes 3 coordinates, got {}",
                        numbers.len()
                    ))),
                }
            }
            "poly" => {
                let numbers = parse_coords(coords)?;
                if numbers.len() < 6 || numbers.len() % 2 != 0 {
                    return Err(ApiError::InvalidCoordinates(format!(
                        "poly takes an even number of coordinates (at least 6), got {}",
                        numbers.len()
                    )));
                }
                let points = numbers.chunks_exact(2).map(|p| (p[0], p[1])).collect();
                Ok(TagShape::Poly { points })
            }
            other => Err(ApiError::InvalidShape(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagShape::Rect { .. } => "rect",
            TagShape::Circle { .. } => "circle",
            TagShape::Poly { .. } => "poly",
        }
    }

    /// Canonical comma-joined coordinate string.
    pub fn coords_string(&self) -> String {
        let numbers: Vec<i32> = match self {
            TagShape::Rect { x, y, w, h } => vec![*x, *y, *w, *h],
            TagShape::Circle { cx, cy, r } => vec![*cx, *cy, *r],
            TagShape::Poly { points } => points.iter().flat_map(|(x, y)| [*x, *y]).collect(),
        };
        numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn parse_coords(coords: &str) -> Result<Vec<i32>, ApiError> {
    coords
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| ApiError::InvalidCoordinates(format!("not a number: {:?}", part.trim())))
        })
        .collect()
}

/// A tag may be removed by the photo's owner or by the user tagged on that
/// specific tag; nobody else, logged in or not.
pub fn can_delete_tag(actor: i64, photo_owner: i64, tagged_user: i64) -> bool {
    actor == photo_owner || actor == tagged_user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_parses_four_numbers() {
        let shape = TagShape::parse("rect", "10, 20, 100, 50").unwrap();
        assert_eq!(
            shape,
            TagShape::Rect {
                x: 10,
                y: 20,
                w: 100,
                h: 50
            }
        );
        assert_eq!(shape.coords_string(), "10,20,100,50");
        assert_eq!(shape.name(), "rect");
    }

    #[test]
    fn rect_rejects_wrong_arity() {
        assert!(matches!(
            TagShape::parse("rect", "1,2,3"),
            Err(ApiError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            TagShape::parse("rect", "1,2,3,4,5"),
            Err(ApiError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn circle_parses_three_numbers() {
        let shape = TagShape::parse("circle", "50,50,25").unwrap();
        assert_eq!(
            shape,
            TagShape::Circle {
                cx: 50,
                cy: 50,
                r: 25
            }
        );
        assert_eq!(shape.coords_string(), "50,50,25");
    }

    #[test]
    fn poly_needs_even_count_of_at_least_six() {
        let shape = TagShape::parse("poly", "0,0,100,0,50,80").unwrap();
        assert_eq!(
            shape,
            TagShape::Poly {
                points: vec![(0, 0), (100, 0), (50, 80)]
            }
        );

        assert!(matches!(
            TagShape::parse("poly", "0,0,100,0"),
            Err(ApiError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            TagShape::parse("poly", "0,0,100,0,50,80,7"),
            Err(ApiError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn unknown_shape_is_rejected_before_coords() {
        assert!(matches!(
            TagShape::parse("triangle", "1,2,3"),
            Err(ApiError::InvalidShape(_))
        ));
        // Even malformed coordinates do not mask the shape error.
        assert!(matches!(
            TagShape::parse("triangle", "a,b"),
            Err(ApiError::InvalidShape(_))
        ));
        assert!(matches!(
            TagShape::parse("triangle", ""),
            Err(ApiError::InvalidShape(_))
        ));
    }

    #[test]
    fn non_numeric_coords_are_rejected() {
        assert!(matches!(
            TagShape::parse("rect", "a,b,c,d"),
            Err(ApiError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            TagShape::parse("circle", "1,,3"),
            Err(ApiError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn canonical_string_survives_reparse() {
        let shape = TagShape::parse("poly", " 0 , 0 , 10 , 0 , 5 , 8 ").unwrap();
        let reparsed = TagShape::parse("poly", &shape.coords_string()).unwrap();
        assert_eq!(shape, reparsed);
    }

    #[test]
    fn delete_permission_is_owner_or_tagged_only() {
        let owner = 1;
        let tagged = 2;
        let stranger = 3;
        assert!(can_delete_tag(owner, owner, tagged));
        assert!(can_delete_tag(tagged, owner, tagged));
        assert!(!can_delete_tag(stranger, owner, tagged));
    }
}
