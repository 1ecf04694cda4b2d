use crate::env::Env;
use crate::term::Term;

/// Unifies two terms under `env`.
///
/// Returns the extended environment (a most general unifier on top of the
/// existing bindings) or `None` when the terms cannot be made equal.
/// `env` is consumed; clones taken before the call are unaffected.
///
/// No occurs-check is performed: unifying `X` with `f(X)` succeeds and leaves
/// a cyclic binding behind.
#[must_use]
pub fn unify(a: &Term, b: &Term, mut env: Env) -> Option<Env> {
    unify_into(a, b, &mut env).then_some(env)
}

fn unify_into(a: &Term, b: &Term, env: &mut Env) -> bool {
    // children are shared, so these clones never copy a subtree
    let a = env.resolve(a).clone();
    let b = env.resolve(b).clone();

    match (&a, &b) {
        (Term::Wildcard, _) | (_, Term::Wildcard) => true,
        (Term::Var(x), Term::Var(y)) if x == y => true,
        (Term::Var(var), other) | (other, Term::Var(var)) => {
            env.bind(var, other.clone());
            true
        }
        (Term::List(xs), Term::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| unify_into(x, y, env))
        }
        (Term::Compound(f), Term::Compound(g)) => {
            f.functor == g.functor
                && f.arity() == g.arity()
                && f.args.iter().zip(&g.args).all(|(x, y)| unify_into(x, y, env))
        }
        (Term::Atom(x), Term::Atom(y)) => x == y,
        _ => false,
    }
}
