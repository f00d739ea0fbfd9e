//! Integration tests for the qb module.

use crate::clause::{ConditionType, JoinType, OrderDirection};
use crate::config::{BoolStyle, BuilderConfig};
use crate::entity::{DynamicRef, TableNameResolver};
use crate::qb::expr::Expr;
use crate::qb::{QueryBuilder, select, select_from};
use std::sync::Arc;

#[allow(dead_code)]
struct User;
#[allow(dead_code)]
struct Session;

fn resolver() -> TableNameResolver {
    Arc::new(|r: &DynamicRef| {
        if r.is::<User>() {
            "users".to_string()
        } else {
            format!("{}s", r.short_name().to_lowercase())
        }
    })
}

#[test]
fn test_select_basic() {
    let qb = select("users");
    assert_eq!(qb.build().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_no_from_fails_everywhere() {
    let qb = QueryBuilder::new().eq("id", 1);
    for err in [
        qb.build().unwrap_err(),
        qb.build_parts().unwrap_err(),
        qb.render_select().unwrap_err(),
        qb.to_count_sql().unwrap_err(),
        qb.table_name().unwrap_err(),
    ] {
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Table name must be specified using from()");
    }
}

#[test]
fn test_dynamic_entity_needs_resolver() {
    let qb = QueryBuilder::new().from(DynamicRef::of::<User>());
    let err = qb.build().unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "getTableNameCallback is required to resolve entity names"
    );

    let qb = qb.resolver(resolver());
    assert_eq!(qb.table_name().unwrap(), "users");
    assert_eq!(qb.build().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_dynamic_entity_with_alias() {
    let qb = QueryBuilder::with_resolver(resolver())
        .from_as(DynamicRef::of::<Session>(), "s")
        .select("s.id");
    assert_eq!(qb.build().unwrap(), "SELECT s.id FROM sessions s");
}

#[test]
fn test_add_join_validation() {
    let err = select("users")
        .add_join(JoinType::Inner, "", None, None, None)
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Join entity is required");

    let err = select("users")
        .add_join(JoinType::Inner, "sessions", Some("s"), Some(ConditionType::On), None)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "INNER JOIN requires a condition criteria when using ON"
    );
}

#[test]
fn test_add_join_forms() {
    let cases: [(JoinType, Option<&str>, Option<ConditionType>, Option<&str>, &str); 7] = [
        (JoinType::Cross, None, None, None, "CROSS JOIN sessions"),
        (JoinType::Cross, Some("s"), None, None, "CROSS JOIN sessions s"),
        (JoinType::Inner, None, None, None, "INNER JOIN sessions"),
        (JoinType::Natural, Some("s"), None, None, "NATURAL JOIN sessions s"),
        (
            JoinType::Inner,
            None,
            Some(ConditionType::Using),
            Some("user_id"),
            "INNER JOIN sessions USING (user_id)",
        ),
        (
            JoinType::Inner,
            None,
            Some(ConditionType::On),
            Some("users.user_id = sessions.user_id"),
            "INNER JOIN sessions ON users.user_id = sessions.user_id",
        ),
        (
            JoinType::Inner,
            Some("s"),
            Some(ConditionType::Using),
            Some("user_id"),
            "INNER JOIN sessions s USING (user_id)",
        ),
    ];
    for (join_type, alias, condition_type, criteria, expected) in cases {
        let qb = select("users")
            .add_join(join_type, "sessions", alias, condition_type, criteria)
            .unwrap();
        assert_eq!(qb.render_joins(), expected);
    }
}

#[test]
fn test_blank_join_alias_is_dropped() {
    let qb = select("users")
        .add_join(JoinType::Inner, "sessions", Some(""), Some(ConditionType::On), Some("a = b"))
        .unwrap()
        .add_join(JoinType::Cross, "regions", Some("  "), None, None)
        .unwrap();
    assert_eq!(
        qb.build().unwrap(),
        "SELECT * FROM users INNER JOIN sessions ON a = b CROSS JOIN regions"
    );
    assert_eq!(qb.joins()[0].alias, None);
}

#[test]
fn test_trailing_as_is_not_an_alias() {
    let qb = select("users AS");
    assert_eq!(qb.build().unwrap(), "SELECT * FROM users");
    let qb = select("users").inner_join("sessions as", "users.id = sessions.user_id").unwrap();
    assert_eq!(
        qb.render_joins(),
        "INNER JOIN sessions ON users.id = sessions.user_id"
    );
}

#[test]
fn test_join_helpers() {
    let qb = select("users u")
        .inner_join_using("profiles p", &["user_id", "tenant_id"])
        .unwrap()
        .left_join("sessions s", "u.id = s.user_id")
        .unwrap()
        .cross_join("regions")
        .unwrap();
    assert_eq!(
        qb.build().unwrap(),
        "SELECT * FROM users u INNER JOIN profiles p USING (user_id, tenant_id) \
         LEFT JOIN sessions s ON u.id = s.user_id CROSS JOIN regions"
    );
    assert_eq!(qb.joins().len(), 3);
    assert_eq!(qb.joins()[1].alias.as_deref(), Some("s"));
}

#[test]
fn test_join_helper_rejects_blank_on() {
    let err = select("users").right_join("sessions", "  ").unwrap_err();
    assert_eq!(
        err.to_string(),
        "RIGHT JOIN requires a condition criteria when using ON"
    );
}

#[test]
fn test_order_by_rendering() {
    let qb = select("users")
        .order_by("name", OrderDirection::Asc)
        .add_order_by("id", OrderDirection::Desc);
    assert_eq!(qb.render_order_by(), " ORDER BY name ASC, id DESC");

    let qb = select("users").add_order_by("user_id", None);
    assert_eq!(qb.render_order_by(), " ORDER BY user_id ASC");

    assert_eq!(select("users").render_order_by(), "");
}

#[test]
fn test_parameter_substitution() {
    let qb = select("users")
        .where_raw("id = :id AND name = :name")
        .set_param(":id", 1)
        .set_param(":name", "John");
    assert_eq!(
        qb.build().unwrap(),
        "SELECT * FROM users WHERE id = 1 AND name = 'John'"
    );
}

#[test]
fn test_parameter_overwrite_and_escape() {
    let qb = select("users")
        .where_raw("name = :name")
        .set_param("name", "first")
        .set_param(":name", "O'Brien");
    assert_eq!(qb.parameters().len(), 1);
    assert_eq!(
        qb.build().unwrap(),
        "SELECT * FROM users WHERE name = 'O''Brien'"
    );
}

#[test]
fn test_unresolved_parameter_modes() {
    let qb = select("users").where_raw("id = :id");
    assert_eq!(qb.build().unwrap(), "SELECT * FROM users WHERE id = :id");

    let err = qb
        .config(BuilderConfig::new().strict())
        .build()
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Unresolved parameter :id");
}

#[test]
fn test_parameter_prefix_of_non_ascii_name_is_not_substituted() {
    let qb = select("t").where_raw("x = :naïve").set_param("na", 1);
    assert_eq!(qb.build().unwrap(), "SELECT * FROM t WHERE x = :naïve");

    let qb = qb.set_param("naïve", 2);
    assert_eq!(qb.build().unwrap(), "SELECT * FROM t WHERE x = 2");
}

#[test]
fn test_casts_and_literals_are_not_parameters() {
    let qb = select("events")
        .where_raw("created_at::date = :day AND note <> ':day'")
        .set_param("day", chrono::NaiveDate::from_ymd_opt(2025, 3, 21).unwrap())
        .config(BuilderConfig::new().strict());
    assert_eq!(
        qb.build().unwrap(),
        "SELECT * FROM events WHERE created_at::date = '2025-03-21' AND note <> ':day'"
    );
}

#[test]
fn test_numeric_bool_style() {
    let qb = select("users")
        .eq("active", true)
        .config(BuilderConfig::new().bool_style(BoolStyle::Numeric));
    assert_eq!(qb.build().unwrap(), "SELECT * FROM users WHERE active = 1");
}

#[test]
fn test_full_pipeline() {
    let qb = select("users u")
        .select_cols(&["u.id", "COUNT(s.id) AS session_count"])
        .left_join("sessions s", "u.id = s.user_id")
        .unwrap()
        .where_raw("u.created_at >= :since")
        .eq("u.status", "active")
        .not_in("u.role", vec!["bot", "system"])
        .group_by(&["u.id"])
        .unwrap()
        .having_raw("COUNT(s.id) > :min")
        .order_by("session_count", OrderDirection::Desc)
        .paginate(3, 25)
        .set_param("min", 2)
        .set_param(
            "since",
            chrono::DateTime::parse_from_rfc3339("2025-03-21T00:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        );
    assert_eq!(
        qb.build().unwrap(),
        "SELECT u.id, COUNT(s.id) AS session_count FROM users u \
         LEFT JOIN sessions s ON u.id = s.user_id \
         WHERE (u.created_at >= '2025-03-21T00:00:00.000Z') AND u.status = 'active' \
         AND u.role NOT IN ('bot', 'system') \
         GROUP BY u.id HAVING COUNT(s.id) > 2 \
         ORDER BY session_count DESC LIMIT 25 OFFSET 50"
    );
}

#[test]
fn test_build_is_idempotent() {
    let qb = select("users u")
        .inner_join("orders o", "u.id = o.user_id")
        .unwrap()
        .where_raw("o.total > :total")
        .set_param("total", 9.5)
        .order_by("u.id", None);
    let first = qb.build().unwrap();
    let second = qb.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(qb.build_parts().unwrap(), qb.build_parts().unwrap());
}

#[test]
fn test_intermediate_states_are_independent() {
    let base = select("users").eq("status", "active");
    let admins = base.clone().eq("role", "admin");
    assert_eq!(base.build().unwrap(), "SELECT * FROM users WHERE status = 'active'");
    assert_eq!(
        admins.build().unwrap(),
        "SELECT * FROM users WHERE status = 'active' AND role = 'admin'"
    );
}

#[test]
fn test_complex_where_expr() {
    let qb = select("users").and_expr(Expr::and(vec![
        Expr::eq("status", "active"),
        Expr::or(vec![
            Expr::eq("role", "admin"),
            Expr::and(vec![Expr::eq("role", "user"), Expr::gt("reputation", 100)]),
        ]),
    ]));
    assert_eq!(
        qb.build().unwrap(),
        "SELECT * FROM users WHERE status = 'active' AND \
         (role = 'admin' OR (role = 'user' AND reputation > 100))"
    );
}

#[test]
fn test_empty_in_list_semantics() {
    let qb = select("users").in_list::<i32>("id", vec![]);
    assert!(qb.build().unwrap().ends_with("WHERE 1=0"));

    let qb = select("users").not_in::<i32>("id", vec![]);
    assert!(qb.build().unwrap().ends_with("WHERE 1=1"));
}

#[test]
fn test_select_from_is_verbatim() {
    let qb = select_from("(SELECT user_id FROM orders) o").select("o.user_id");
    assert_eq!(
        qb.build().unwrap(),
        "SELECT o.user_id FROM (SELECT user_id FROM orders) o"
    );
    assert_eq!(qb.table_name().unwrap(), "(SELECT user_id FROM orders) o");
}

#[test]
fn test_distinct_and_null_checks() {
    let qb = select("users")
        .select("email")
        .distinct()
        .is_not_null("email")
        .is_null("deleted_at");
    assert_eq!(
        qb.build().unwrap(),
        "SELECT DISTINCT email FROM users WHERE email IS NOT NULL AND deleted_at IS NULL"
    );
}
