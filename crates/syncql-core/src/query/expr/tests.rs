use crate::{
    query::expr::{
        BinaryOp, Expr, ExprError, ExprKind, FieldRef, ParamKind, RenderError, Renderer, UnaryOp,
        catalog::{BINARY_OPERATORS, FUNCTIONS, Function, UNARY_OPERATORS},
    },
    test_fixtures::{MOVIE_MODEL, TestMovie},
    value::{LiteralError, ScalarType},
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn render(expr: &Expr) -> String {
    Renderer::new(MOVIE_MODEL).render(expr).unwrap()
}

fn render_err(expr: &Expr) -> RenderError {
    Renderer::new(MOVIE_MODEL).render(expr).unwrap_err()
}

// ----------------------------------------------------------------------
// Catalog
// ----------------------------------------------------------------------

#[test]
fn operator_tables_are_indexed_by_discriminant() {
    for (i, (op, token)) in BINARY_OPERATORS.iter().enumerate() {
        assert_eq!(*op as usize, i, "binary table out of order at '{token}'");
        assert_eq!(op.token(), *token);
    }
    for (i, (op, _)) in UNARY_OPERATORS.iter().enumerate() {
        assert_eq!(*op as usize, i);
    }
    assert_eq!(UnaryOp::Negate as usize, UNARY_OPERATORS.len() - 1);
    assert_eq!(BinaryOp::Mod as usize, BINARY_OPERATORS.len() - 1);
}

#[test]
fn function_table_is_indexed_by_discriminant() {
    for (i, spec) in FUNCTIONS.iter().enumerate() {
        assert_eq!(spec.function as usize, i, "function table out of order");
        assert_eq!(Function::from_name(spec.name), Some(spec.function));
        assert_eq!(spec.function.name(), spec.name);
        assert!(spec.required <= spec.params.len());
    }
    assert_eq!(Function::Floor as usize, FUNCTIONS.len() - 1);
}

#[test]
fn wire_names_cover_the_service_grammar() {
    let names: Vec<_> = FUNCTIONS.iter().map(|spec| spec.name).collect();
    assert_eq!(
        names,
        [
            "endswith",
            "startswith",
            "contains",
            "indexof",
            "substring",
            "concat",
            "tolower",
            "toupper",
            "trim",
            "length",
            "day",
            "month",
            "year",
            "round",
            "ceiling",
            "floor",
        ]
    );
}

#[test]
fn unknown_function_names_are_unsupported() {
    assert_eq!(Function::from_name("EndsWith"), None);

    let err = Expr::call_named("soundex", vec![TestMovie::TITLE.expr()]).unwrap_err();
    assert_eq!(
        err,
        ExprError::UnsupportedFunction {
            name: "soundex".to_string()
        }
    );
}

// ----------------------------------------------------------------------
// Construction and typing
// ----------------------------------------------------------------------

#[test]
fn comparisons_type_as_bool() {
    let expr = TestMovie::YEAR.gt(1929).unwrap();
    assert_eq!(expr.ty(), ScalarType::Bool);
    assert!(matches!(
        expr.kind(),
        ExprKind::Binary {
            op: BinaryOp::Gt,
            ..
        }
    ));
}

#[test]
fn arithmetic_takes_the_wider_numeric_type() {
    let year = || TestMovie::YEAR.expr();

    assert_eq!(year().add(10).unwrap().ty(), ScalarType::Int);
    assert_eq!(year().div(1000.5).unwrap().ty(), ScalarType::Float64);
    assert_eq!(year().mul(2.5f32).unwrap().ty(), ScalarType::Float32);
    assert_eq!(
        Expr::constant(1.5f32).add(2.5f64).unwrap().ty(),
        ScalarType::Float64
    );
}

#[test]
fn narrower_constants_convert_to_the_wider_type() {
    let expr = TestMovie::YEAR
        .expr()
        .div(1000.5)
        .unwrap()
        .eq(2)
        .unwrap();
    assert_eq!(render(&expr), "((year div 1000.5) eq 2.0)");

    let expr = TestMovie::DURATION
        .expr()
        .div(60.0)
        .unwrap()
        .round()
        .unwrap()
        .eq(2.0f32)
        .unwrap();
    assert_eq!(render(&expr), "(round((duration div 60.0)) eq 2.0)");
}

#[test]
fn narrower_fields_render_unchanged() {
    let expr = TestMovie::YEAR.lt(1990.5f32).unwrap();
    assert_eq!(render(&expr), "(year lt 1990.5f)");
}

#[test]
fn function_return_types() {
    let title = || TestMovie::TITLE.expr();

    assert_eq!(title().ends_with("er").unwrap().ty(), ScalarType::Bool);
    assert_eq!(title().index_of("-").unwrap().ty(), ScalarType::Int);
    assert_eq!(title().length().unwrap().ty(), ScalarType::Int);
    assert_eq!(title().substring(3).unwrap().ty(), ScalarType::Text);
    assert_eq!(
        TestMovie::RELEASE_DATE.expr().month().unwrap().ty(),
        ScalarType::Int
    );
    assert_eq!(
        TestMovie::YEAR.expr().floor().unwrap().ty(),
        ScalarType::Float64
    );
    assert_eq!(
        Expr::field("rank", ScalarType::Float32)
            .ceiling()
            .unwrap()
            .ty(),
        ScalarType::Float32
    );
}

#[test]
fn text_addition_lowers_to_concat() {
    let expr = TestMovie::TITLE
        .expr()
        .add(TestMovie::MPAA_RATING)
        .unwrap();
    assert!(matches!(
        expr.kind(),
        ExprKind::Call {
            function: Function::Concat,
            ..
        }
    ));
    assert_eq!(expr.ty(), ScalarType::Text);

    let expr = expr.eq("Fight ClubR").unwrap();
    assert_eq!(render(&expr), "(concat(title,rating) eq 'Fight ClubR')");
}

#[test]
fn mismatched_operands_are_rejected() {
    assert_eq!(
        TestMovie::TITLE.eq(5).unwrap_err(),
        ExprError::TypeMismatch {
            op: "eq",
            left: ScalarType::Text,
            right: ScalarType::Int,
        }
    );
    assert!(matches!(
        TestMovie::YEAR.expr().and(true),
        Err(ExprError::TypeMismatch { op: "and", .. })
    ));
    assert!(matches!(
        TestMovie::BEST_PICTURE_WINNER.lt(true),
        Err(ExprError::TypeMismatch { op: "lt", .. })
    ));
    assert!(matches!(
        TestMovie::TITLE.expr().sub("x"),
        Err(ExprError::TypeMismatch { op: "sub", .. })
    ));
    assert!(matches!(
        TestMovie::RELEASE_DATE.gt("1999-12-31"),
        Err(ExprError::TypeMismatch { op: "gt", .. })
    ));
}

#[test]
fn null_only_compares_for_equality() {
    assert_eq!(
        render(&TestMovie::MPAA_RATING.is_null().unwrap()),
        "(rating eq null)"
    );
    assert_eq!(
        render(&TestMovie::MPAA_RATING.ne(None::<String>).unwrap()),
        "(rating ne null)"
    );

    assert!(TestMovie::YEAR.lt(Expr::null()).is_err());
    assert!(Expr::null().eq(Expr::null()).is_err());
}

#[test]
fn unary_operands_are_checked() {
    assert_eq!(
        TestMovie::YEAR.not().unwrap_err(),
        ExprError::InvalidOperand {
            op: "not",
            ty: ScalarType::Int,
        }
    );
    assert_eq!(
        TestMovie::TITLE.expr().neg().unwrap_err(),
        ExprError::InvalidOperand {
            op: "-",
            ty: ScalarType::Text,
        }
    );
}

#[test]
fn function_arguments_are_checked() {
    assert_eq!(
        Expr::call(Function::Substring, vec![TestMovie::TITLE.expr()]).unwrap_err(),
        ExprError::Arity {
            function: "substring",
            min: 2,
            max: 3,
            found: 1,
        }
    );
    assert_eq!(
        TestMovie::YEAR.expr().ends_with("x").unwrap_err(),
        ExprError::ArgumentType {
            function: "endswith",
            index: 0,
            expected: ParamKind::Text,
            found: ScalarType::Int,
        }
    );
    assert!(matches!(
        TestMovie::TITLE.expr().substring_len(0, 2.5),
        Err(ExprError::ArgumentType { index: 2, .. })
    ));
    assert!(matches!(
        TestMovie::TITLE.expr().day(),
        Err(ExprError::ArgumentType {
            expected: ParamKind::Timestamp,
            ..
        })
    ));
}

#[test]
fn non_finite_constants_are_rejected_on_construction() {
    assert!(matches!(
        TestMovie::YEAR.expr().div(f64::NAN),
        Err(ExprError::Literal(LiteralError::NonFiniteFloat { .. }))
    ));
    assert!(matches!(
        TestMovie::SCORE.gt(f64::INFINITY),
        Err(ExprError::Literal(LiteralError::NonFiniteFloat { .. }))
    ));
}

#[test]
fn node_count_and_depth() {
    let expr = TestMovie::YEAR
        .gt(1929)
        .unwrap()
        .and(TestMovie::YEAR.lt(1940).unwrap())
        .unwrap();

    assert_eq!(expr.node_count(), 7);
    assert_eq!(expr.depth(), 3);
}

// ----------------------------------------------------------------------
// Rendering
// ----------------------------------------------------------------------

#[test]
fn boolean_fields_and_negation() {
    let winner = TestMovie::BEST_PICTURE_WINNER;

    assert_eq!(render(&winner.expr()), "bestPictureWinner");
    assert_eq!(render(&winner.not().unwrap()), "not(bestPictureWinner)");
    assert_eq!(
        render(&winner.eq(true).unwrap().not().unwrap()),
        "not((bestPictureWinner eq true))"
    );
    assert_eq!(
        render(&winner.ne(false).unwrap()),
        "(bestPictureWinner ne false)"
    );
}

#[test]
fn logical_nodes_are_fully_parenthesized() {
    let decade = |from: i32, to: i32| {
        TestMovie::YEAR
            .gte(from)
            .unwrap()
            .and(TestMovie::YEAR.lte(to).unwrap())
            .unwrap()
    };
    let expr = decade(1930, 1940).or(decade(1950, 1960)).unwrap();

    assert_eq!(
        render(&expr),
        "(((year ge 1930) and (year le 1940)) or ((year ge 1950) and (year le 1960)))"
    );
}

#[test]
fn arithmetic_and_negation_render_inline() {
    let expr = TestMovie::YEAR
        .expr()
        .sub(1900)
        .unwrap()
        .lt(TestMovie::DURATION)
        .unwrap();
    assert_eq!(render(&expr), "((year sub 1900) lt duration)");

    let expr = TestMovie::DURATION
        .expr()
        .rem(2)
        .unwrap()
        .eq(1)
        .unwrap();
    assert_eq!(render(&expr), "((duration mod 2) eq 1)");

    let expr = TestMovie::DURATION.expr().neg().unwrap().lt(-90).unwrap();
    assert_eq!(render(&expr), "(-duration lt -90)");
}

#[test]
fn function_calls_render_comma_joined() {
    let rating = || TestMovie::MPAA_RATING.expr();

    assert_eq!(
        render(&rating().to_lower().unwrap().starts_with("pg").unwrap()),
        "startswith(tolower(rating),'pg')"
    );
    assert_eq!(
        render(&rating().index_of('-').unwrap().gt(0).unwrap()),
        "(indexof(rating,'-') gt 0)"
    );
    assert_eq!(
        render(&rating().substring_len(0, 2).unwrap().eq("PG").unwrap()),
        "(substring(rating,0,2) eq 'PG')"
    );
    assert_eq!(
        render(
            &TestMovie::TITLE
                .expr()
                .trim()
                .unwrap()
                .length()
                .unwrap()
                .gt(10)
                .unwrap()
        ),
        "(length(trim(title)) gt 10)"
    );
    assert_eq!(
        render(
            &TestMovie::RELEASE_DATE
                .expr()
                .year()
                .unwrap()
                .ne(TestMovie::YEAR)
                .unwrap()
        ),
        "(year(releaseDate) ne year)"
    );
}

#[test]
fn timestamps_render_as_casts() {
    let when = Utc.with_ymd_and_hms(1994, 10, 14, 0, 0, 0).unwrap();
    let expr = TestMovie::RELEASE_DATE.eq(when).unwrap();

    assert_eq!(
        render(&expr),
        "(releaseDate eq cast(1994-10-14T00:00:00.000Z,Edm.DateTimeOffset))"
    );
}

#[test]
fn unknown_fields_fail_resolution() {
    let expr = Expr::field("director", ScalarType::Text).eq("Nolan").unwrap();

    assert_eq!(
        render_err(&expr),
        RenderError::UnknownField {
            entity: "movie",
            field: "director".to_string(),
        }
    );
}

#[test]
fn declared_type_must_match_the_model() {
    let expr = FieldRef::new("year", ScalarType::Text).eq("1999").unwrap();

    assert_eq!(
        render_err(&expr),
        RenderError::FieldTypeMismatch {
            entity: "movie",
            field: "year".to_string(),
            declared: ScalarType::Int,
            used: ScalarType::Text,
        }
    );
}

#[test]
fn non_finite_leaves_fail_to_render() {
    assert_eq!(
        render_err(&Expr::constant(f64::NAN)),
        RenderError::Literal(LiteralError::NonFiniteFloat {
            value: "NaN".to_string(),
        })
    );
    assert!(matches!(
        render_err(&Expr::constant(f32::INFINITY)),
        RenderError::Literal(LiteralError::NonFiniteFloat { .. })
    ));
}

#[test]
fn depth_limit_is_enforced() {
    let mut expr = TestMovie::BEST_PICTURE_WINNER.expr();
    for _ in 0..9 {
        expr = expr.not().unwrap();
    }
    assert_eq!(expr.depth(), 10);

    let renderer = Renderer::new(MOVIE_MODEL);
    assert!(renderer.with_max_depth(10).render(&expr).is_ok());
    assert_eq!(
        renderer.with_max_depth(9).render(&expr).unwrap_err(),
        RenderError::TooDeep { max: 9 }
    );
}

// ----------------------------------------------------------------------
// Properties
// ----------------------------------------------------------------------

proptest! {
    #[test]
    fn repeated_negation_is_never_simplified(n in 0usize..12) {
        let mut expr = TestMovie::BEST_PICTURE_WINNER.expr();
        for _ in 0..n {
            expr = expr.not().unwrap();
        }

        let expected = format!("{}bestPictureWinner{}", "not(".repeat(n), ")".repeat(n));
        prop_assert_eq!(render(&expr), expected);
    }

    #[test]
    fn text_constants_double_embedded_quotes(s in ".*") {
        let expr = TestMovie::TITLE.eq(s.as_str()).unwrap();

        prop_assert_eq!(render(&expr), format!("(title eq '{}')", s.replace('\'', "''")));
    }

    #[test]
    fn rendering_is_deterministic(lo in -5000i64..5000, hi in -5000i64..5000) {
        let expr = TestMovie::YEAR
            .gt(lo)
            .unwrap()
            .and(TestMovie::YEAR.lt(hi).unwrap())
            .unwrap();

        prop_assert_eq!(render(&expr), render(&expr.clone()));
        prop_assert_eq!(render(&expr), format!("((year gt {lo}) and (year lt {hi}))"));
    }
}
