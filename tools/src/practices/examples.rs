//! Canned guidance per framework and component type

use serde::{Deserialize, Serialize};

use crate::framework::Framework;

/// Kind of unit guidance is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Controller,
    Model,
    Service,
    Component,
    Screen,
    Hook,
    Type,
    Mutation,
    Resolver,
}

impl ComponentType {
    pub const NAMES: [&'static str; 9] = [
        "controller",
        "model",
        "service",
        "component",
        "screen",
        "hook",
        "type",
        "mutation",
        "resolver",
    ];
}

/// Practices and an example snippet for one component type
#[derive(Debug, Clone, Serialize)]
pub struct Guidance {
    pub framework: Framework,
    pub component_type: ComponentType,
    pub practices: Vec<&'static str>,
    pub example: &'static str,
}

/// Look up guidance; `None` when the framework has no such component type
pub fn lookup(framework: Framework, component_type: ComponentType) -> Option<Guidance> {
    let (practices, example): (&[&'static str], &'static str) = match (framework, component_type) {
        (Framework::Rails, ComponentType::Controller) => (
            &[
                "Keep actions to the seven RESTful verbs",
                "Authenticate with before_action",
                "Whitelist input with strong parameters",
                "Delegate business logic to models or services",
            ],
            RAILS_CONTROLLER,
        ),
        (Framework::Rails, ComponentType::Model) => (
            &[
                "Validate required attributes",
                "Declare associations with dependent: options",
                "Expose query logic through scopes",
            ],
            RAILS_MODEL,
        ),
        (Framework::Rails, ComponentType::Service) => (
            &[
                "One public entry point (call)",
                "Return a result object instead of raising for expected failures",
                "Wrap multi-record writes in a transaction",
            ],
            RAILS_SERVICE,
        ),
        (Framework::ReactNative, ComponentType::Component) => (
            &[
                "Keep components pure and typed through props",
                "Define styles with StyleSheet.create",
                "Memoize pure children with React.memo",
            ],
            RN_COMPONENT,
        ),
        (Framework::ReactNative, ComponentType::Screen) => (
            &[
                "Render collections with FlatList",
                "Handle loading and error states explicitly",
                "Fetch data in effects with dependency arrays",
            ],
            RN_SCREEN,
        ),
        (Framework::ReactNative, ComponentType::Hook) => (
            &[
                "Prefix custom hooks with use",
                "Return stable callbacks with useCallback",
                "Clean up subscriptions in the effect teardown",
            ],
            RN_HOOK,
        ),
        (Framework::Graphql, ComponentType::Type) => (
            &[
                "Describe every field",
                "Declare nullability explicitly",
                "Expose lists as connections",
            ],
            GQL_TYPE,
        ),
        (Framework::Graphql, ComponentType::Mutation) => (
            &[
                "Check context[:current_user] before writing",
                "Return an errors field next to the payload",
                "Use input arguments with explicit types",
            ],
            GQL_MUTATION,
        ),
        (Framework::Graphql, ComponentType::Resolver) => (
            &[
                "Batch association loads with dataloader",
                "Scope records to the current user",
                "Keep resolvers thin and delegate to models",
            ],
            GQL_RESOLVER,
        ),
        _ => return None,
    };

    Some(Guidance {
        framework,
        component_type,
        practices: practices.to_vec(),
        example,
    })
}

const RAILS_CONTROLLER: &str = r#"class PostsController < ApplicationController
  before_action :authenticate_user!
  before_action :set_post, only: %i[show update destroy]

  def create
    @post = current_user.posts.build(post_params)
    if @post.save
      redirect_to @post
    else
      render :new, status: :unprocessable_entity
    end
  end

  private

  def post_params
    params.require(:post).permit(:title, :body)
  end
end"#;

const RAILS_MODEL: &str = r#"class Post < ApplicationRecord
  belongs_to :user
  has_many :comments, dependent: :destroy

  validates :title, presence: true, length: { maximum: 120 }

  scope :published, -> { where.not(published_at: nil) }
end"#;

const RAILS_SERVICE: &str = r#"class PublishPost
  Result = Struct.new(:success?, :post, :errors)

  def self.call(post)
    new(post).call
  end

  def initialize(post)
    @post = post
  end

  def call
    Post.transaction { @post.update!(published_at: Time.current) }
    Result.new(true, @post, [])
  rescue ActiveRecord::RecordInvalid => e
    Result.new(false, @post, e.record.errors.full_messages)
  end
end"#;

const RN_COMPONENT: &str = r#"import React from 'react';
import { Text, View, StyleSheet } from 'react-native';

const PostCard = React.memo(({ title, excerpt }) => (
  <View style={styles.card}>
    <Text style={styles.title}>{title}</Text>
    <Text>{excerpt}</Text>
  </View>
));

const styles = StyleSheet.create({
  card: { padding: 16 },
  title: { fontWeight: '600' },
});

export default PostCard;"#;

const RN_SCREEN: &str = r#"const PostsScreen = () => {
  const { data, loading, error } = useQuery(POSTS_QUERY);

  if (loading) return <ActivityIndicator />;
  if (error) return <ErrorView error={error} />;

  return (
    <FlatList
      data={data.posts}
      keyExtractor={(item) => item.id}
      renderItem={({ item }) => <PostCard {...item} />}
    />
  );
};"#;

const RN_HOOK: &str = r#"export function useDebounce(value, delay = 300) {
  const [debounced, setDebounced] = useState(value);

  useEffect(() => {
    const id = setTimeout(() => setDebounced(value), delay);
    return () => clearTimeout(id);
  }, [value, delay]);

  return debounced;
}"#;

const GQL_TYPE: &str = r#"module Types
  class PostType < Types::BaseObject
    field :id, ID, null: false, description: "Post identifier"
    field :title, String, null: false, description: "Headline"
    field :comments, Types::CommentType.connection_type, null: false, description: "Comments"
  end
end"#;

const GQL_MUTATION: &str = r#"module Mutations
  class CreatePost < BaseMutation
    argument :title, String, required: true

    field :post, Types::PostType, null: true
    field :errors, [String], null: false

    def resolve(title:)
      user = context[:current_user] or raise GraphQL::ExecutionError, "Not authenticated"
      post = user.posts.build(title: title)
      post.save ? { post: post, errors: [] } : { post: nil, errors: post.errors.full_messages }
    end
  end
end"#;

const GQL_RESOLVER: &str = r#"module Types
  class PostType < Types::BaseObject
    field :author, Types::UserType, null: false, description: "Author"

    def author
      dataloader.with(Sources::Record, User).load(object.user_id)
    end
  end
end"#;
