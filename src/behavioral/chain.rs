// Chain of Responsibility
// Handlers live in an arena owned by the caller; links are plain indices kept
// beside each node, so no handler ever owns its successor.

use std::fmt;

use log::{debug, trace};

use crate::error::{PatternError, Result};

// ============================================================================
// Handler interface
// ============================================================================

/// Index of a handler inside the [`HandlerChain`] that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(usize);

impl HandlerId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A link in the chain. Each handler either produces a result or passes the
/// request to `next`.
///
/// The default `handle` forwards unconditionally, which is the behaviour of a
/// handler that has nothing to contribute.
pub trait Handler<R: ?Sized>: Send + Sync {
    fn name(&self) -> &str;

    fn handle(&self, request: &R, next: Successor<'_, R>) -> Option<String> {
        next.handle(request)
    }
}

/// The rest of the chain as seen from one handler.
pub struct Successor<'a, R: ?Sized> {
    chain: &'a HandlerChain<R>,
    id: Option<HandlerId>,
}

impl<R: ?Sized> Clone for Successor<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ?Sized> Copy for Successor<'_, R> {}

impl<'a, R: ?Sized> Successor<'a, R> {
    /// Delegates to the next handler, or returns `None` at the end of the chain.
    pub fn handle(self, request: &R) -> Option<String> {
        let id = self.id?;
        trace!("forwarding request to {}", self.chain.label(id));
        self.chain.dispatch(id, request)
    }

    pub fn is_end(&self) -> bool {
        self.id.is_none()
    }

    pub fn id(&self) -> Option<HandlerId> {
        self.id
    }
}

// ============================================================================
// Arena
// ============================================================================

struct Node<R: ?Sized> {
    handler: Box<dyn Handler<R>>,
    next: Option<HandlerId>,
}

/// Owns a set of handlers and the links between them.
///
/// Links are set with [`HandlerChain::set_next`] or the fluent
/// [`HandlerChain::link`] cursor. Nothing prevents a link back to an ancestor;
/// dispatching into such a cycle recurses without bound.
pub struct HandlerChain<R: ?Sized> {
    nodes: Vec<Node<R>>,
}

impl<R: ?Sized> Default for HandlerChain<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> fmt::Debug for HandlerChain<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.nodes
                    .iter()
                    .map(|node| (node.handler.name(), node.next.map(HandlerId::index))),
            )
            .finish()
    }
}

impl<R: ?Sized> HandlerChain<R> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Registers a handler with no successor.
    pub fn add<H>(&mut self, handler: H) -> HandlerId
    where
        H: Handler<R> + 'static,
    {
        self.nodes.push(Node {
            handler: Box::new(handler),
            next: None,
        });
        HandlerId(self.nodes.len() - 1)
    }

    /// Links `id -> next` and returns `next`, so the result can be fed into
    /// another `set_next` to extend the chain from its new tail.
    pub fn set_next(&mut self, id: HandlerId, next: HandlerId) -> Result<HandlerId> {
        self.check(next)?;
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(PatternError::UnknownHandler(id))?;
        node.next = Some(next);
        Ok(next)
    }

    /// Fluent cursor: `chain.link(a)?.set_next(b)?.set_next(c)?` links a->b->c.
    pub fn link(&mut self, id: HandlerId) -> Result<Link<'_, R>> {
        self.check(id)?;
        Ok(Link { chain: self, id })
    }

    pub fn next_of(&self, id: HandlerId) -> Option<HandlerId> {
        self.nodes.get(id.0).and_then(|node| node.next)
    }

    pub fn name(&self, id: HandlerId) -> Option<&str> {
        self.nodes.get(id.0).map(|node| node.handler.name())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Starts dispatch at `entry`. Any node may be the entry point; earlier
    /// links are simply never visited.
    ///
    /// `Ok(None)` means no handler took the request.
    ///
    /// Each hop is a nested call through [`Successor::handle`], so stack use
    /// grows with the number of handlers visited. Chains of some hundred
    /// thousand links overflow the default thread stack.
    pub fn handle(&self, entry: HandlerId, request: &R) -> Result<Option<String>> {
        self.check(entry)?;
        let result = self.dispatch(entry, request);
        match &result {
            Some(_) => debug!("request handled (entry {})", self.label(entry)),
            None => debug!("request left unhandled (entry {})", self.label(entry)),
        }
        Ok(result)
    }

    /// Handler ids reachable from `entry`, in link order.
    pub fn walk(&self, entry: HandlerId) -> Walk<'_, R> {
        Walk {
            chain: self,
            cursor: self.nodes.get(entry.0).map(|_| entry),
        }
    }

    /// Renders the handler names reachable from `entry`, e.g. `Monkey > Squirrel > Dog`.
    pub fn describe(&self, entry: HandlerId) -> String {
        self.walk(entry)
            .map(|id| self.label(id))
            .collect::<Vec<_>>()
            .join(" > ")
    }

    fn dispatch(&self, id: HandlerId, request: &R) -> Option<String> {
        let node = self.nodes.get(id.0)?;
        let next = Successor {
            chain: self,
            id: node.next,
        };
        node.handler.handle(request, next)
    }

    fn check(&self, id: HandlerId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(PatternError::UnknownHandler(id))
        }
    }

    fn label(&self, id: HandlerId) -> &str {
        self.name(id).unwrap_or("<unknown>")
    }
}

/// Cursor returned by [`HandlerChain::link`].
pub struct Link<'a, R: ?Sized> {
    chain: &'a mut HandlerChain<R>,
    id: HandlerId,
}

impl<'a, R: ?Sized> Link<'a, R> {
    /// Links the current node to `next` and moves the cursor onto `next`.
    pub fn set_next(self, next: HandlerId) -> Result<Link<'a, R>> {
        let id = self.chain.set_next(self.id, next)?;
        Ok(Link {
            chain: self.chain,
            id,
        })
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }
}

/// Iterator returned by [`HandlerChain::walk`].
pub struct Walk<'a, R: ?Sized> {
    chain: &'a HandlerChain<R>,
    cursor: Option<HandlerId>,
}

impl<R: ?Sized> Iterator for Walk<'_, R> {
    type Item = HandlerId;

    fn next(&mut self) -> Option<HandlerId> {
        let current = self.cursor?;
        self.cursor = self.chain.next_of(current);
        Some(current)
    }
}

// ============================================================================
// Concrete handlers
// ============================================================================

/// Accepts exactly one token and passes everything else along.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenHandler<T> {
    name: String,
    token: T,
}

impl<T> TokenHandler<T> {
    pub fn new(name: impl Into<String>, token: T) -> Self {
        Self {
            name: name.into(),
            token,
        }
    }

    pub fn token(&self) -> &T {
        &self.token
    }
}

impl TokenHandler<String> {
    pub fn monkey() -> Self {
        Self::new("Monkey", "Banana".to_string())
    }

    pub fn squirrel() -> Self {
        Self::new("Squirrel", "Nut".to_string())
    }

    pub fn dog() -> Self {
        Self::new("Dog", "MeatBall".to_string())
    }
}

impl<R, T> Handler<R> for TokenHandler<T>
where
    R: ?Sized + fmt::Display,
    T: PartialEq<R> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, request: &R, next: Successor<'_, R>) -> Option<String> {
        if self.token.eq(request) {
            Some(format!("{}: I'll eat the {}.", self.name, request))
        } else {
            next.handle(request)
        }
    }
}

// ============================================================================
// Client code
// ============================================================================

/// Feeds each request to the chain starting at `entry` and renders what the
/// client sees, one line per entry.
pub fn client_code<S>(
    chain: &HandlerChain<str>,
    entry: HandlerId,
    requests: &[S],
) -> Result<Vec<String>>
where
    S: AsRef<str>,
{
    let mut lines = Vec::with_capacity(requests.len() * 2);
    for food in requests {
        let food = food.as_ref();
        lines.push(format!("Client: Who wants a {food}?"));
        match chain.handle(entry, food)? {
            Some(result) => lines.push(format!("  {result}")),
            None => lines.push(format!("  {food} was left untouched.")),
        }
    }
    Ok(lines)
}

/// Builds Monkey > Squirrel > Dog and returns the ids in link order.
pub fn feeding_chain() -> Result<(HandlerChain<str>, Vec<HandlerId>)> {
    let mut chain: HandlerChain<str> = HandlerChain::new();
    let monkey = chain.add(TokenHandler::monkey());
    let squirrel = chain.add(TokenHandler::squirrel());
    let dog = chain.add(TokenHandler::dog());
    chain.link(monkey)?.set_next(squirrel)?.set_next(dog)?;
    Ok((chain, vec![monkey, squirrel, dog]))
}

/// Registers `handlers` in order and links each one to the next.
pub fn linear_chain<R, H, I>(handlers: I) -> Result<(HandlerChain<R>, Vec<HandlerId>)>
where
    R: ?Sized,
    H: Handler<R> + 'static,
    I: IntoIterator<Item = H>,
{
    let mut chain = HandlerChain::new();
    let ids: Vec<_> = handlers.into_iter().map(|h| chain.add(h)).collect();
    for pair in ids.windows(2) {
        chain.set_next(pair[0], pair[1])?;
    }
    Ok((chain, ids))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FOOD: [&str; 3] = ["Nut", "Banana", "Cup of coffee"];

    struct Silent;

    impl Handler<str> for Silent {
        fn name(&self) -> &str {
            "Silent"
        }
    }

    #[test]
    fn test_feeding_scenario() {
        let (chain, ids) = feeding_chain().unwrap();
        let results: Vec<_> = FOOD
            .iter()
            .map(|food| chain.handle(ids[0], food).unwrap())
            .collect();

        assert_eq!(
            results,
            [
                Some("Squirrel: I'll eat the Nut.".to_string()),
                Some("Monkey: I'll eat the Banana.".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_fluent_set_next_links_in_order() {
        let (chain, ids) = feeding_chain().unwrap();
        let [monkey, squirrel, dog] = [ids[0], ids[1], ids[2]];

        assert_eq!(chain.next_of(monkey), Some(squirrel));
        assert_eq!(chain.next_of(squirrel), Some(dog));
        assert_eq!(chain.next_of(dog), None);
    }

    #[test]
    fn test_set_next_returns_argument() {
        let mut chain: HandlerChain<str> = HandlerChain::new();
        let a = chain.add(Silent);
        let b = chain.add(Silent);
        assert_eq!(chain.set_next(a, b).unwrap(), b);
    }

    #[test]
    fn test_set_next_overwrites_previous_link() {
        let mut chain: HandlerChain<str> = HandlerChain::new();
        let a = chain.add(TokenHandler::monkey());
        let b = chain.add(TokenHandler::squirrel());
        let c = chain.add(TokenHandler::dog());

        chain.set_next(a, b).unwrap();
        chain.set_next(a, c).unwrap();

        assert_eq!(chain.next_of(a), Some(c));
        assert_eq!(chain.handle(a, "Nut").unwrap(), None);
    }

    #[test]
    fn test_subchain_skips_earlier_links() {
        let (chain, ids) = feeding_chain().unwrap();
        let squirrel = ids[1];

        assert_eq!(chain.handle(squirrel, "Banana").unwrap(), None);
        assert_eq!(
            chain.handle(squirrel, "MeatBall").unwrap().as_deref(),
            Some("Dog: I'll eat the MeatBall.")
        );
    }

    #[test]
    fn test_default_handle_forwards() {
        let mut chain: HandlerChain<str> = HandlerChain::new();
        let silent = chain.add(Silent);
        let dog = chain.add(TokenHandler::dog());
        chain.set_next(silent, dog).unwrap();

        assert_eq!(
            chain.handle(silent, "MeatBall").unwrap().as_deref(),
            Some("Dog: I'll eat the MeatBall.")
        );
        assert_eq!(chain.handle(dog, "Nut").unwrap(), None);
    }

    #[test]
    fn test_successor_reports_end_of_chain() {
        struct Tail;

        impl Handler<str> for Tail {
            fn name(&self) -> &str {
                "Tail"
            }

            fn handle(&self, _request: &str, next: Successor<'_, str>) -> Option<String> {
                if next.is_end() {
                    return Some("end of chain".to_string());
                }
                next.id().map(|id| format!("followed by {id}"))
            }
        }

        let mut chain: HandlerChain<str> = HandlerChain::new();
        let first = chain.add(Tail);
        let second = chain.add(Tail);
        let cursor = chain.link(first).unwrap().set_next(second).unwrap();
        assert_eq!(cursor.id(), second);

        assert_eq!(chain.handle(first, "x").unwrap().as_deref(), Some("followed by #1"));
        assert_eq!(chain.handle(second, "x").unwrap().as_deref(), Some("end of chain"));
        assert_eq!(format!("{chain:?}"), r#"[("Tail", Some(1)), ("Tail", None)]"#);
    }

    #[test]
    fn test_unknown_handler_rejected() {
        let (mut chain, ids) = feeding_chain().unwrap();
        let mut other: HandlerChain<str> = HandlerChain::new();
        let extra = (0..4).map(|_| other.add(Silent)).last().unwrap();

        assert!(matches!(
            chain.handle(extra, "Nut"),
            Err(PatternError::UnknownHandler(id)) if id == extra
        ));
        assert!(chain.set_next(ids[0], extra).is_err());
        assert!(chain.link(extra).is_err());
        // The failed link left the original chain intact.
        assert_eq!(chain.next_of(ids[0]), Some(ids[1]));
    }

    #[test]
    fn test_linear_chain_matches_fluent_links() {
        let (chain, ids) = linear_chain::<str, _, _>([
            TokenHandler::monkey(),
            TokenHandler::squirrel(),
            TokenHandler::dog(),
        ])
        .unwrap();

        assert_eq!(chain.describe(ids[0]), "Monkey > Squirrel > Dog");
        assert_eq!(client_code(&chain, ids[0], &FOOD).unwrap().len(), 6);
    }

    #[test]
    fn test_long_chain_reaches_tail() {
        let (chain, ids) =
            linear_chain::<u32, _, _>((0..1_000u32).map(|i| TokenHandler::new(format!("H{i}"), i)))
                .unwrap();

        assert_eq!(chain.len(), 1_000);
        assert_eq!(
            chain.handle(ids[0], &999).unwrap().as_deref(),
            Some("H999: I'll eat the 999.")
        );
        assert_eq!(chain.handle(ids[0], &1_000).unwrap(), None);
    }

    #[test]
    fn test_token_handler_accessors() {
        let dog = TokenHandler::dog();
        assert_eq!(dog.token(), "MeatBall");
        assert_eq!(Handler::<str>::name(&dog), "Dog");
        assert_eq!(*TokenHandler::new("Rabbit", 7u8).token(), 7);
    }

    #[test]
    fn test_linear_chain_empty() {
        let (chain, ids) = linear_chain::<str, TokenHandler<String>, _>([]).unwrap();
        assert!(chain.is_empty());
        assert!(ids.is_empty());
    }

    #[test]
    fn test_describe_and_walk() {
        let (chain, ids) = feeding_chain().unwrap();

        assert_eq!(chain.describe(ids[0]), "Monkey > Squirrel > Dog");
        assert_eq!(chain.describe(ids[1]), "Squirrel > Dog");
        assert_eq!(chain.walk(ids[0]).collect::<Vec<_>>(), ids);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_client_code_transcript() {
        let (chain, ids) = feeding_chain().unwrap();
        let lines = client_code(&chain, ids[0], &FOOD).unwrap();

        assert_eq!(
            lines,
            [
                "Client: Who wants a Nut?",
                "  Squirrel: I'll eat the Nut.",
                "Client: Who wants a Banana?",
                "  Monkey: I'll eat the Banana.",
                "Client: Who wants a Cup of coffee?",
                "  Cup of coffee was left untouched.",
            ]
        );
    }

    #[test]
    fn test_concurrent_traversal() {
        let (chain, ids) = feeding_chain().unwrap();

        std::thread::scope(|s| {
            for food in FOOD {
                let chain = &chain;
                let entry = ids[0];
                s.spawn(move || {
                    for _ in 0..100 {
                        let result = chain.handle(entry, food).unwrap();
                        assert_eq!(result.is_some(), food != "Cup of coffee");
                    }
                });
            }
        });
    }

    // ------------------------------------------------------------------------
    // Property tests
    // ------------------------------------------------------------------------

    fn build(tokens: &[u8]) -> (HandlerChain<u8>, Vec<HandlerId>) {
        linear_chain(
            tokens
                .iter()
                .enumerate()
                .map(|(i, &token)| TokenHandler::new(format!("H{i}"), token)),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn test_first_match_wins(tokens in prop::collection::vec(0u8..8, 1..12), request in 0u8..10) {
            let (chain, ids) = build(&tokens);
            let expected = tokens
                .iter()
                .position(|&t| t == request)
                .map(|i| format!("H{i}: I'll eat the {request}."));

            prop_assert_eq!(chain.handle(ids[0], &request).unwrap(), expected);
        }

        #[test]
        fn test_subchain_equivalence(
            tokens in prop::collection::vec(0u8..8, 1..12),
            k in any::<prop::sample::Index>(),
            request in 0u8..10,
        ) {
            let k = k.index(tokens.len());
            let (chain, ids) = build(&tokens);
            let (tail, tail_ids) = build(&tokens[k..]);

            // Names differ by offset, so compare which position handled it.
            let from_k = chain.handle(ids[k], &request).unwrap();
            let fresh = tail.handle(tail_ids[0], &request).unwrap();
            prop_assert_eq!(from_k.is_some(), fresh.is_some());
            if let (Some(a), Some(b)) = (from_k, fresh) {
                let pos = |s: &str, offset: usize| -> usize {
                    s[1..s.find(':').unwrap()].parse::<usize>().unwrap() - offset
                };
                prop_assert_eq!(pos(&a, k), pos(&b, 0));
            }
        }
    }
}
