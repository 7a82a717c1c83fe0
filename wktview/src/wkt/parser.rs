use wktview_types::{Coord, Geometry, GeometryType};

use super::lexer::{Lexer, Token, TokenKind};
use crate::error::WktError;

/// Parses a WKT geometry. The whole text must be consumed.
///
/// ```
/// use wktview::wkt;
/// use wktview_types::{Coord, Geometry};
///
/// let point = wkt::parse("point(30 10)").unwrap();
/// assert_eq!(point, Geometry::Point(Some(Coord::new(30.0, 10.0))));
/// ```
pub fn parse(text: &str) -> Result<Geometry, WktError> {
    let mut parser = Parser {
        lexer: Lexer::new(text),
    };
    let geometry = parser.geometry()?;

    let token = parser.lexer.next();
    match token.kind {
        TokenKind::End => Ok(geometry),
        _ => Err(unexpected(token)),
    }
}

fn unexpected(token: Token) -> WktError {
    match token.kind {
        TokenKind::End => WktError::UnexpectedEnd {
            position: token.position,
        },
        _ => WktError::UnexpectedToken {
            token: token.text().to_string(),
            position: token.position,
        },
    }
}

/// Reads a geometry keyword, possibly with a dimension suffix glued to it (`POINTZ`).
fn geometry_type(word: &str) -> Result<GeometryType, WktError> {
    if let Ok(geometry_type) = word.parse::<GeometryType>() {
        return Ok(geometry_type);
    }

    let upper = word.to_ascii_uppercase();
    ["ZM", "Z", "M"]
        .into_iter()
        .filter_map(|suffix| upper.strip_suffix(suffix))
        .find_map(|base| base.parse::<GeometryType>().ok())
        .ok_or_else(|| WktError::InvalidGeometryType {
            name: word.to_string(),
        })
}

fn is_dimension_tag(word: &str) -> bool {
    ["Z", "M", "ZM"].iter().any(|t| t.eq_ignore_ascii_case(word))
}

fn empty(geometry_type: GeometryType) -> Geometry {
    match geometry_type {
        GeometryType::Point => Geometry::Point(None),
        GeometryType::LineString => Geometry::LineString(vec![]),
        GeometryType::Polygon => Geometry::Polygon(vec![]),
        GeometryType::MultiPoint => Geometry::MultiPoint(vec![]),
        GeometryType::MultiLineString => Geometry::MultiLineString(vec![]),
        GeometryType::MultiPolygon => Geometry::MultiPolygon(vec![]),
        GeometryType::GeometryCollection => Geometry::GeometryCollection(vec![]),
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl Parser<'_> {
    fn geometry(&mut self) -> Result<Geometry, WktError> {
        let token = self.lexer.next();
        let TokenKind::Word(word) = token.kind else {
            return Err(unexpected(token));
        };
        let geometry_type = geometry_type(word)?;

        if let TokenKind::Word(tag) = self.lexer.peek().kind {
            if is_dimension_tag(tag) {
                self.lexer.next();
            }
        }

        if let TokenKind::Word(word) = self.lexer.peek().kind {
            if word.eq_ignore_ascii_case("EMPTY") {
                self.lexer.next();
                return Ok(empty(geometry_type));
            }
        }

        let geometry = match geometry_type {
            GeometryType::Point => {
                self.expect(TokenKind::LeftParen)?;
                let coord = self.coord()?;
                self.expect(TokenKind::RightParen)?;
                Geometry::Point(Some(coord))
            }
            GeometryType::LineString => Geometry::LineString(self.coords()?),
            GeometryType::Polygon => Geometry::Polygon(self.rings()?),
            GeometryType::MultiPoint => Geometry::MultiPoint(self.list(Self::multipoint_member)?),
            GeometryType::MultiLineString => Geometry::MultiLineString(self.rings()?),
            GeometryType::MultiPolygon => Geometry::MultiPolygon(self.list(Self::rings)?),
            GeometryType::GeometryCollection => {
                Geometry::GeometryCollection(self.list(Self::geometry)?)
            }
        };

        Ok(geometry)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), WktError> {
        let token = self.lexer.next();
        if token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(token))
        }
    }

    /// Parenthesized, comma separated, non-empty list.
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, WktError>,
    ) -> Result<Vec<T>, WktError> {
        self.expect(TokenKind::LeftParen)?;
        let mut items = vec![item(self)?];
        loop {
            let token = self.lexer.next();
            match token.kind {
                TokenKind::Comma => items.push(item(self)?),
                TokenKind::RightParen => return Ok(items),
                _ => return Err(unexpected(token)),
            }
        }
    }

    fn coords(&mut self) -> Result<Vec<Coord>, WktError> {
        self.list(Self::coord)
    }

    fn rings(&mut self) -> Result<Vec<Vec<Coord>>, WktError> {
        self.list(Self::coords)
    }

    // Both `MULTIPOINT ((1 2), (3 4))` and `MULTIPOINT (1 2, 3 4)` are in use.
    fn multipoint_member(&mut self) -> Result<Coord, WktError> {
        if self.lexer.peek().kind == TokenKind::LeftParen {
            self.lexer.next();
            let coord = self.coord()?;
            self.expect(TokenKind::RightParen)?;
            Ok(coord)
        } else {
            self.coord()
        }
    }

    fn coord(&mut self) -> Result<Coord, WktError> {
        let x = self.number()?;
        let y = self.number()?;

        // z and m
        for _ in 0..2 {
            if matches!(self.lexer.peek().kind, TokenKind::Number(_)) {
                self.number()?;
            }
        }

        Ok(Coord::new(x, y))
    }

    fn number(&mut self) -> Result<f64, WktError> {
        let token = self.lexer.next();
        let TokenKind::Number(text) = token.kind else {
            return Err(unexpected(token));
        };

        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| WktError::InvalidNumber {
                text: text.to_string(),
                position: token.position,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn point() {
        assert_eq!(parse("POINT (30 10)"), Ok(Geometry::Point(Some(c(30.0, 10.0)))));
        assert_eq!(parse("  point(30 10)  "), Ok(Geometry::Point(Some(c(30.0, 10.0)))));
        assert_eq!(parse("POINT Z (1 2 3)"), Ok(Geometry::Point(Some(c(1.0, 2.0)))));
        assert_eq!(parse("PointZM (1 2 3 4)"), Ok(Geometry::Point(Some(c(1.0, 2.0)))));
        assert_eq!(parse("POINT EMPTY"), Ok(Geometry::Point(None)));
    }

    #[test]
    fn polygon_with_hole() {
        let geometry = parse(
            "POLYGON ((35 10, 45 45, 15 40, 10 20, 35 10), (20 30, 35 35, 30 20, 20 30))",
        )
        .expect("invalid wkt");
        assert_matches!(geometry, Geometry::Polygon(rings) => {
            assert_eq!(rings.len(), 2);
            assert_eq!(rings[0].len(), 5);
            assert_eq!(rings[1][1], c(35.0, 35.0));
        });
    }

    #[test]
    fn multipoint_forms() {
        let expected = Geometry::MultiPoint(vec![c(10.0, 40.0), c(40.0, 30.0)]);
        assert_eq!(parse("MULTIPOINT ((10 40), (40 30))"), Ok(expected.clone()));
        assert_eq!(parse("MULTIPOINT (10 40, 40 30)"), Ok(expected));
    }

    #[test]
    fn multi_geometries() {
        assert_matches!(
            parse("MULTILINESTRING ((10 10, 20 20, 10 40), (40 40, 30 30, 40 20, 30 10))"),
            Ok(Geometry::MultiLineString(lines)) if lines.len() == 2 && lines[1].len() == 4
        );
        assert_matches!(
            parse("MULTIPOLYGON (((30 20, 45 40, 10 40, 30 20)), ((15 5, 40 10, 10 20, 5 10, 15 5)))"),
            Ok(Geometry::MultiPolygon(polygons)) if polygons.len() == 2 && polygons[1][0].len() == 5
        );
    }

    #[test]
    fn collection() {
        assert_eq!(
            parse("GEOMETRYCOLLECTION (POINT (40 10), LINESTRING (10 10, 20 20), POINT EMPTY)"),
            Ok(Geometry::GeometryCollection(vec![
                Geometry::Point(Some(c(40.0, 10.0))),
                Geometry::LineString(vec![c(10.0, 10.0), c(20.0, 20.0)]),
                Geometry::Point(None),
            ]))
        );
        assert_eq!(
            parse("GEOMETRYCOLLECTION EMPTY"),
            Ok(Geometry::GeometryCollection(vec![]))
        );
    }

    #[test]
    fn unterminated_point() {
        assert_eq!(
            parse("POINT (30 10"),
            Err(WktError::UnexpectedEnd { position: 12 })
        );
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(
            parse("POINT (30 10))"),
            Err(WktError::UnexpectedToken {
                token: ")".to_string(),
                position: 13
            })
        );
        assert_eq!(
            parse("POINT (30, 10)"),
            Err(WktError::UnexpectedToken {
                token: ",".to_string(),
                position: 9
            })
        );
        assert_eq!(
            parse("LINESTRING ()"),
            Err(WktError::UnexpectedToken {
                token: ")".to_string(),
                position: 12
            })
        );
        assert_eq!(parse(""), Err(WktError::UnexpectedEnd { position: 0 }));
        assert_eq!(
            parse("CIRCLE (1 2)"),
            Err(WktError::InvalidGeometryType {
                name: "CIRCLE".to_string()
            })
        );
        assert_eq!(
            parse("POINT (1e 2)"),
            Err(WktError::InvalidNumber {
                text: "1e".to_string(),
                position: 7
            })
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            parse("POINT (30 10").unwrap_err().to_string(),
            "Unexpected end of input at position 12"
        );
        assert_eq!(
            parse("FOO (1 2)").unwrap_err().to_string(),
            "Invalid geometry type: FOO"
        );
    }
}
